use alloy::contract::Error as ContractError;

use crate::{types::ChainId, wallet::WalletError};

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The active chain cannot be used. `chain_id` is `None` when there is no
    /// wallet connection at all; both cases are one failure path for callers.
    #[error("Unsupported network: {}", .chain_id.map_or_else(|| "no wallet connection".to_string(), |id| format!("chain id {id}")))]
    UnsupportedNetwork { chain_id: Option<ChainId> },

    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Chain registry misconfigured: {reason}")]
    RegistryInvalid { reason: String },

    #[error("Contract set is stale: built on chain {built_on}, wallet now on chain {active}")]
    StaleContracts { built_on: ChainId, active: ChainId },

    #[error("Invalid token amount '{amount}': {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("Transaction receipt failed: {reason}")]
    ReceiptFailed { reason: String },

    #[error("Transaction reverted on-chain: {tx_hash}")]
    Reverted { tx_hash: String },
}
