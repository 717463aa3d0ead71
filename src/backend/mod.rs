mod error;
#[cfg(test)]
pub(crate) mod fake;
mod http;

use async_trait::async_trait;
pub use error::BackendError;
use error::Result;
pub use http::HttpBackend;
use serde::{Deserialize, Serialize};

use crate::types::{EstateRecord, OperatorProfile, OwnerProfile, Position, TokenListing, TxRecord};

/// Portal login credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Off-chain bookkeeping API.
///
/// The backend mirrors on-chain state for display and holds the records the
/// chain has no business storing (KYC profiles, the transaction log). It is
/// never consulted as a source of truth for anything a contract can answer.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Exchange admin credentials for a bearer token.
    async fn admin_login(&self, credentials: &Credentials) -> Result<String>;

    /// Exchange node-operator credentials for a bearer token.
    async fn operator_login(&self, credentials: &Credentials) -> Result<String>;

    /// Register an estate owner's KYC profile.
    async fn register_estate_owner(&self, profile: &OwnerProfile) -> Result<()>;

    /// Look up an estate owner's profile by wallet address.
    ///
    /// Returns `None` when no profile is registered for the address.
    async fn estate_owner(&self, address: &str) -> Result<Option<OwnerProfile>>;

    /// List all registered node operators.
    async fn operators(&self) -> Result<Vec<OperatorProfile>>;

    /// Mirror an operator's on-chain approval status.
    async fn update_operator_status(&self, address: &str, approved: bool) -> Result<()>;

    /// List all recorded estates.
    async fn estates(&self) -> Result<Vec<EstateRecord>>;

    /// Record a newly registered estate.
    async fn create_estate(&self, estate: &EstateRecord) -> Result<()>;

    /// Mirror an estate's on-chain verification status.
    async fn update_estate_status(&self, estate_id: u64, verified: bool) -> Result<()>;

    /// List all tokenization listings.
    async fn listings(&self) -> Result<Vec<TokenListing>>;

    /// Record a newly created tokenization listing.
    async fn create_listing(&self, listing: &TokenListing) -> Result<()>;

    /// Look up an investor's recorded position in one estate.
    ///
    /// Returns `None` when the backend holds no record for the pair.
    async fn position(&self, investor: &str, estate_id: u64) -> Result<Option<Position>>;

    /// Insert or replace an investor's position record.
    async fn upsert_position(&self, position: &Position) -> Result<()>;

    /// Append a confirmed transaction to the log.
    async fn record_transaction(&self, record: &TxRecord) -> Result<()>;
}
