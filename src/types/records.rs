use serde::{Deserialize, Serialize};

use super::ChainId;

/// An estate as the backend tracks it.
///
/// On-chain state (verification, tokenization) is mirrored here for display
/// only; the chain remains the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstateRecord {
    pub estate_id: u64,
    pub owner: String,
    pub name: String,
    pub location: String,
    /// Valuation in payment-token base units, stringified.
    pub valuation: String,
    pub verified: bool,
    pub tokenized: bool,
}

/// A tokenization listing for one estate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenListing {
    pub estate_id: u64,
    /// Total token supply minted for the estate.
    pub supply: String,
    /// Tokens still available for purchase.
    pub remaining: String,
    /// Price per token in payment-token base units, stringified.
    pub price_per_token: String,
    pub active: bool,
}

/// An investor's holding in one estate's token supply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub investor: String,
    pub estate_id: u64,
    /// Token balance, stringified base units.
    pub balance: String,
    pub chain_id: ChainId,
}

/// A node operator as the backend tracks it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorProfile {
    pub address: String,
    pub name: String,
    pub approved: bool,
    /// Collateral locked on-chain, stringified base units (display mirror).
    pub collateral: String,
}

/// An estate owner's off-chain profile (KYC bookkeeping).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerProfile {
    pub address: String,
    pub name: String,
    pub email: String,
    pub kyc_document: String,
}

/// One confirmed on-chain action, appended to the backend transaction log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxRecord {
    pub tx_hash: String,
    pub chain_id: ChainId,
    pub actor: String,
    /// Action label, e.g. "approve-operator", "buy-tokens".
    pub action: String,
    /// Amount moved by the action in base units, stringified; "0" when the
    /// action moves no funds.
    pub amount: String,
}
