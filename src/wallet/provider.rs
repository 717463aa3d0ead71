use alloy::primitives::Address;
use async_trait::async_trait;

use super::{WalletError, events::WalletEvents};
use crate::{
    chain::{BlockchainProvider, NetworkDescriptor},
    types::ChainId,
};

/// Capability surface of an injected wallet.
///
/// Models the EIP-1193 provider the original client talked to: account
/// authorization, chain introspection and switching, and a signer-bound RPC
/// provider for contract calls. Implementations own the signing key; this
/// crate never sees it.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Request account authorization, prompting the user if needed
    /// (`eth_requestAccounts`).
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Return the already-authorized accounts without prompting
    /// (`eth_accounts`). An empty list means not connected.
    async fn accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// The wallet's active chain (`eth_chainId`).
    async fn chain_id(&self) -> Result<ChainId, WalletError>;

    /// Make `chain_id` the active chain (`wallet_switchEthereumChain`).
    ///
    /// Fails with [`WalletError::UnrecognizedChain`] when the wallet has
    /// never been given that chain; callers fall back to [`add_chain`].
    ///
    /// [`add_chain`]: WalletProvider::add_chain
    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError>;

    /// Register a chain with the wallet and make it active
    /// (`wallet_addEthereumChain`).
    async fn add_chain(&self, descriptor: &NetworkDescriptor) -> Result<(), WalletError>;

    /// Build a provider bound to the wallet's signer and its *current* chain.
    ///
    /// Rebuilt on every call; implementations must not hand out a provider
    /// built for a previously active chain.
    async fn signer_provider(&self) -> Result<BlockchainProvider, WalletError>;

    /// Subscribe to `accountsChanged` / `chainChanged` notifications.
    fn subscribe(&self) -> WalletEvents;
}
