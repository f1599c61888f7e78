//! Process configuration for the gateway itself.
//!
//! Backend addresses live in [`bridge_backends::BackendConfig`]; this covers
//! the listening socket and the shared bearer secret. The secret has no
//! fallback: starting without one is a configuration error, not a degraded
//! mode.

/// Gateway process configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to bind the listener to (`BRIDGE_LISTEN_ADDR`).
    pub listen_addr: String,
    /// Shared bearer secret compared against inbound tokens (`BRIDGE_TOKEN`).
    pub auth_token: String,
}

/// Errors detected while resolving the gateway configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// `BRIDGE_TOKEN` is unset or empty.
    #[error("BRIDGE_TOKEN is not set; refusing to start without a shared secret")]
    MissingAuthToken,
}

impl GatewayConfig {
    /// Default listen address when `BRIDGE_LISTEN_ADDR` is unset.
    pub const DEFAULT_LISTEN_ADDR: &'static str = "0.0.0.0:3000";

    /// Read the gateway configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingAuthToken`] when no shared secret is
    /// configured; the caller is expected to fail fast.
    pub fn from_env() -> Result<Self, ConfigError> {
        let auth_token = std::env::var("BRIDGE_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingAuthToken)?;
        let listen_addr = std::env::var("BRIDGE_LISTEN_ADDR")
            .ok()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_LISTEN_ADDR.to_owned());
        Ok(Self {
            listen_addr,
            auth_token,
        })
    }
}
