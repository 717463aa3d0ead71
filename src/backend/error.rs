use thiserror::Error;

/// Backend API errors.
///
/// Every failure mode collapses to a single human-readable line; callers
/// branch on `Unauthorized` to drop a stale token and treat the rest as
/// opaque.
#[derive(Error, Debug)]
pub enum BackendError {
    /// HTTP transport failed before a response arrived
    #[error("Backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the bearer token (HTTP 401)
    #[error("Backend rejected the session token")]
    Unauthorized,

    /// Backend returned a non-success response
    #[error("Backend error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Failed to parse backend response: {reason}")]
    Parse { reason: String },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, BackendError>;
