//! Wallet connection and session state.
//!
//! [`WalletSession`] is the single source of truth for the connected address
//! and active chain. It sits on top of an injected [`WalletProvider`] and
//! keeps the rest of the client honest: dashboards are entered only with a
//! non-empty address, and contract calls only happen on a supported chain.

mod error;
mod events;
#[cfg(test)]
pub(crate) mod fake;
mod keyed;
mod provider;

use std::sync::Arc;

use alloy::primitives::Address;
pub use error::WalletError;
pub use events::{WalletEvents, WalletNotification};
pub use keyed::KeyedWallet;
pub use provider::WalletProvider;
use tokio::sync::RwLock;

use crate::{
    chain::{ChainError, ChainRegistry},
    observability,
    session_store::SessionStore,
    types::ChainId,
};

/// Result of a passive connection check, safe to run at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected(Address),
    NotConnected,
    NoWallet,
    Error(String),
}

#[derive(Debug, Clone, Copy, Default)]
struct Snapshot {
    address: Option<Address>,
    chain_id: Option<ChainId>,
}

/// Tracks the connected account and active chain for one wallet.
pub struct WalletSession {
    wallet: Option<Arc<dyn WalletProvider>>,
    state: RwLock<Snapshot>,
}

impl WalletSession {
    /// `wallet` is `None` when no provider was injected; every interactive
    /// operation then fails with [`WalletError::NoWallet`].
    pub fn new(wallet: Option<Arc<dyn WalletProvider>>) -> Self {
        Self {
            wallet,
            state: RwLock::new(Snapshot::default()),
        }
    }

    pub fn wallet(&self) -> Option<&Arc<dyn WalletProvider>> {
        self.wallet.as_ref()
    }

    /// The last observed address. Empty means no dashboard may be entered.
    pub async fn address(&self) -> Option<Address> {
        self.state.read().await.address
    }

    /// Interactive connect: authorizes accounts and adopts the first one.
    ///
    /// Rejection or an already-pending prompt leaves prior state unchanged.
    pub async fn connect(&self) -> Result<Address, WalletError> {
        let wallet = self.wallet.as_ref().ok_or(WalletError::NoWallet)?;

        let accounts = wallet.request_accounts().await?;
        let address = accounts.first().copied().ok_or(WalletError::NoAccounts)?;
        let chain_id = wallet.chain_id().await.ok();

        let mut state = self.state.write().await;
        state.address = Some(address);
        if let Some(id) = chain_id {
            state.chain_id = Some(id);
        }
        drop(state);

        tracing::info!(address = %address, "Wallet connected");
        observability::record_wallet_event("connected");
        Ok(address)
    }

    /// Passive connection check (`eth_accounts`), never prompts.
    pub async fn current_connection(&self) -> ConnectionStatus {
        let Some(wallet) = self.wallet.as_ref() else {
            return ConnectionStatus::NoWallet;
        };

        match wallet.accounts().await {
            Ok(accounts) => match accounts.first().copied() {
                Some(address) => {
                    self.state.write().await.address = Some(address);
                    ConnectionStatus::Connected(address)
                }
                None => {
                    self.state.write().await.address = None;
                    ConnectionStatus::NotConnected
                }
            },
            Err(error) => ConnectionStatus::Error(error.to_string()),
        }
    }

    /// Live read of the wallet's active chain. `None` when there is no wallet
    /// or the read fails; the snapshot keeps its last good value.
    pub async fn chain_id(&self) -> Option<ChainId> {
        let wallet = self.wallet.as_ref()?;
        match wallet.chain_id().await {
            Ok(chain_id) => {
                self.state.write().await.chain_id = Some(chain_id);
                Some(chain_id)
            }
            Err(error) => {
                tracing::warn!(error = %error, "Failed to read wallet chain id");
                None
            }
        }
    }

    /// Ask the wallet to activate `chain_id`.
    ///
    /// A wallet that does not recognize the chain gets it registered via
    /// `add_chain` with the registry's full descriptor, which also activates
    /// it. An id outside the registry is refused up front. Failures surface
    /// once; there is no retry.
    pub async fn switch_network(
        &self,
        registry: &ChainRegistry,
        chain_id: ChainId,
    ) -> Result<(), ChainError> {
        let Some(wallet) = self.wallet.as_ref() else {
            return Err(ChainError::UnsupportedNetwork { chain_id: None });
        };
        let descriptor =
            registry
                .descriptor(chain_id)
                .ok_or(ChainError::UnsupportedNetwork {
                    chain_id: Some(chain_id),
                })?;

        match wallet.switch_chain(chain_id).await {
            Ok(()) => {}
            Err(WalletError::UnrecognizedChain { .. }) => {
                tracing::info!(
                    chain_id = %chain_id,
                    chain_name = descriptor.chain_name,
                    "Wallet does not know the chain; adding it"
                );
                wallet.add_chain(descriptor).await?;
            }
            Err(error) => return Err(error.into()),
        }

        self.state.write().await.chain_id = Some(chain_id);
        observability::record_wallet_event("network-switched");
        Ok(())
    }

    /// Forget the connected address and drop the persisted role and token.
    pub async fn disconnect(
        &self,
        store: &SessionStore,
    ) -> Result<(), crate::session_store::SessionStoreError> {
        self.state.write().await.address = None;
        store.clear().await?;
        tracing::info!("Wallet session disconnected");
        observability::record_wallet_event("disconnected");
        Ok(())
    }

    /// Drive wallet notifications into session state until the wallet goes
    /// away. Run this on its own task.
    pub fn spawn_event_pump(
        self: &Arc<Self>,
        store: Arc<SessionStore>,
    ) -> tokio::task::JoinHandle<()> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.run_event_pump(store).await })
    }

    async fn run_event_pump(&self, store: Arc<SessionStore>) {
        let Some(wallet) = self.wallet.as_ref() else {
            return;
        };
        let mut events = wallet.subscribe();

        while let Some(notification) = events.next().await {
            match notification {
                WalletNotification::AccountsChanged(accounts) => {
                    self.apply_accounts_changed(accounts, &store).await;
                }
                WalletNotification::ChainChanged(chain_id) => {
                    self.apply_chain_changed(chain_id).await;
                }
            }
        }

        tracing::debug!("Wallet event stream closed; event pump exiting");
    }

    /// A non-empty list replaces the address with its first entry. An empty
    /// list is a wallet-side disconnect: the address, the persisted role, and
    /// the auth token all go in one step.
    async fn apply_accounts_changed(&self, accounts: Vec<Address>, store: &SessionStore) {
        observability::record_wallet_event("accounts-changed");
        match accounts.first().copied() {
            Some(address) => {
                self.state.write().await.address = Some(address);
                tracing::info!(address = %address, "Active account changed");
            }
            None => {
                self.state.write().await.address = None;
                if let Err(error) = store.clear().await {
                    tracing::warn!(
                        error = %error,
                        "Failed to clear persisted session after wallet disconnect"
                    );
                }
                tracing::info!("Wallet reported no accounts; session cleared");
            }
        }
    }

    /// The assumed role survives a chain change; only contract handles built
    /// on the previous chain become stale.
    async fn apply_chain_changed(&self, chain_id: ChainId) {
        observability::record_wallet_event("chain-changed");
        self.state.write().await.chain_id = Some(chain_id);
        tracing::info!(chain_id = %chain_id, "Active chain changed");
    }
}
