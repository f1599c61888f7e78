//! Error types for the backends crate.

/// Errors that can occur while forwarding a request to a backend.
///
/// Every variant is terminal for the inbound request: nothing is retried,
/// and the gateway surfaces the message to the caller.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BackendError {
    /// A required backend address or credential is absent from the
    /// environment. The message names which backend.
    #[error("{0}")]
    NotConfigured(&'static str),

    /// The backend answered with a non-success status.
    #[error("{backend} request failed with status {status}")]
    UpstreamStatus { backend: &'static str, status: u16 },

    /// Transport-level failure: connect error, timeout, or an unreadable
    /// response body.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}
