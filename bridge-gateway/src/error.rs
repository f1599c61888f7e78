//! Error types for the gateway crate.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bridge_backends::BackendError;
use bridge_core::Envelope;

/// Errors that can occur during gateway request handling.
///
/// Every variant renders as the error envelope; no error is retried or
/// recovered, each is terminal for its request.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BridgeError {
    /// The request body is malformed or missing required fields.
    #[error("{0}")]
    InvalidRequest(String),

    /// No `Authorization: Bearer ...` header was supplied.
    #[error("missing auth")]
    MissingAuth,

    /// The supplied bearer token does not match the shared secret.
    #[error("forbidden")]
    Forbidden,

    /// The request path matched no route.
    #[error("not found")]
    NotFound,

    /// The source address exceeded the fixed-window request ceiling.
    #[error("too many requests")]
    RateLimited,

    /// The `channel` discriminator named no known messaging provider.
    #[error("no provider configured for channel")]
    UnsupportedChannel,

    /// The `task` discriminator named no known scheduled job.
    #[error("no scheduled backend configured")]
    UnsupportedTask,

    /// A failure propagated from the outbound backend call.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = match &self {
            BridgeError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            BridgeError::MissingAuth => StatusCode::UNAUTHORIZED,
            BridgeError::Forbidden => StatusCode::FORBIDDEN,
            BridgeError::NotFound => StatusCode::NOT_FOUND,
            BridgeError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            BridgeError::UnsupportedChannel
            | BridgeError::UnsupportedTask
            | BridgeError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(Envelope::error(self.to_string()))).into_response()
    }
}
