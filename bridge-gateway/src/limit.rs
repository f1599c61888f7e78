//! Fixed-window per-source rate limiter.
//!
//! Process-wide constants: at most [`MAX_REQUESTS`] requests per source IP
//! per [`WINDOW`]. Applied ahead of auth on every route; the per-source
//! counters are the only cross-request mutable state in the gateway.

use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, RwLock},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::BridgeError, state::AppState};

/// Length of one counting window.
pub const WINDOW: Duration = Duration::from_secs(10);

/// Request ceiling per source within one window.
pub const MAX_REQUESTS: u32 = 60;

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Thread-safe registry of per-source request counters.
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: RwLock<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    /// Create an empty limiter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request from `source` and return whether it is admitted.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned (a previous thread
    /// panicked while holding the write lock).
    pub fn allow(&self, source: IpAddr) -> bool {
        self.allow_at(source, Instant::now())
    }

    fn allow_at(&self, source: IpAddr, now: Instant) -> bool {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let mut windows = self.windows.write().expect("rate limiter lock poisoned");
        // Forwarding headers let a caller mint unlimited source keys, so
        // expired windows must not accumulate: drop them before counting.
        windows.retain(|_, window| now.duration_since(window.started) < WINDOW);
        let window = windows.entry(source).or_insert(Window {
            started: now,
            count: 0,
        });
        if window.count >= MAX_REQUESTS {
            return false;
        }
        window.count += 1;
        true
    }

    #[cfg(test)]
    fn tracked_sources(&self) -> usize {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        self.windows
            .read()
            .expect("rate limiter lock poisoned")
            .len()
    }
}

/// Source identity: first `X-Forwarded-For` entry if parseable, else the
/// peer socket address, else unspecified.
fn client_ip(request: &Request) -> IpAddr {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            if let Ok(ip) = first.trim().parse() {
                return ip;
            }
        }
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |info| info.0.ip())
}

/// Middleware: reject requests from sources over the window ceiling.
///
/// # Errors
/// Returns [`BridgeError::RateLimited`] once a source exceeds
/// [`MAX_REQUESTS`] within the current window.
pub async fn enforce_rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, BridgeError> {
    let source = client_ip(&request);
    if !state.limiter.allow(source) {
        tracing::warn!(source = %source, path = %request.uri().path(), "rate limit exceeded");
        return Err(BridgeError::RateLimited);
    }
    Ok(next.run(request).await)
}
