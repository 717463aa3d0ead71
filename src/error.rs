use thiserror::Error;

/// Top-level client error that composes all subsystem errors.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Wallet/session errors
    #[error("Wallet error: {0}")]
    Wallet(#[from] crate::wallet::WalletError),

    /// Chain resolution and contract errors
    #[error("Chain error: {0}")]
    Chain(#[from] crate::chain::ChainError),

    /// Backend API errors
    #[error("Backend error: {0}")]
    Backend(#[from] crate::backend::BackendError),

    /// Persisted session errors
    #[error("Session error: {0}")]
    Session(#[from] crate::session_store::SessionStoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Dashboard operation errors
    #[error("Service error: {0}")]
    Service(#[from] crate::services::ServiceError),

    /// View routing errors
    #[error("Access error: {0}")]
    Access(#[from] crate::access::AccessError),
}
