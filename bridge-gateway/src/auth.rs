//! Bearer-token auth guard for the business routes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{error::BridgeError, state::AppState};

/// Constant-time string comparison (prevents timing attacks).
fn safe_equal(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    // XOR each byte and accumulate; any difference makes the result non-zero.
    let diff = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}

/// Middleware: require a valid `Authorization: Bearer <token>` header.
///
/// # Errors
/// Returns [`BridgeError::MissingAuth`] when the header is absent or not a
/// bearer scheme, [`BridgeError::Forbidden`] when the token does not match
/// the shared secret. On success the request proceeds unchanged.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, BridgeError> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let Some(token) = header.and_then(|h| h.strip_prefix("Bearer ")) else {
        return Err(BridgeError::MissingAuth);
    };
    if !safe_equal(token, &state.config.auth_token) {
        return Err(BridgeError::Forbidden);
    }
    Ok(next.run(request).await)
}
