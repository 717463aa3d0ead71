use alloy::signers::local::LocalSignerError;

use crate::types::ChainId;

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("No wallet provider detected")]
    NoWallet,

    #[error("User rejected the wallet request")]
    UserRejected,

    #[error("A wallet request is already pending")]
    AlreadyPending,

    #[error("Wallet returned no authorized accounts")]
    NoAccounts,

    #[error("Wallet does not recognize chain {chain_id}")]
    UnrecognizedChain { chain_id: ChainId },

    #[error("Invalid private key (length: {key_length})")]
    InvalidPrivateKey {
        key_length: usize,
        #[source]
        source: LocalSignerError,
    },

    #[error("Provider initialization failed: {reason}")]
    ProviderInit { reason: String },

    #[error("Wallet transport error: {reason}")]
    Transport { reason: String },
}
