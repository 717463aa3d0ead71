use thiserror::Error;

use crate::{backend::BackendError, chain::ChainError, session_store::SessionStoreError};

/// Errors surfaced by dashboard operations.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A contract operation was attempted without a connected account
    #[error("No wallet connection; connect an account first")]
    NotConnected,

    /// The listing exists but is closed to trading
    #[error("Listing for estate {estate_id} is not active")]
    ListingInactive { estate_id: u64 },

    /// Chain-side failure
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    /// Backend failure outside a confirmed-transaction flow
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Session persistence failure
    #[error("Session error: {0}")]
    Session(#[from] SessionStoreError),
}
