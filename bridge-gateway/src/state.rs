//! Process-wide shared state handed to every route handler.

use std::time::Instant;

use bridge_backends::BackendClient;

use crate::{config::GatewayConfig, limit::RateLimiter};

/// Everything a route handler needs, resolved once at startup and shared
/// behind an `Arc`. Only the rate limiter holds mutable state.
pub struct AppState {
    pub config: GatewayConfig,
    pub backends: BackendClient,
    pub limiter: RateLimiter,
    /// Process start time, reported by the health route.
    pub started: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(config: GatewayConfig, backends: BackendClient) -> Self {
        Self {
            config,
            backends,
            limiter: RateLimiter::new(),
            started: Instant::now(),
        }
    }
}
