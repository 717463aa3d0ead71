use std::{collections::BTreeMap, sync::Arc};

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{Provider, ProviderBuilder},
    signers::local::{LocalSignerError, PrivateKeySigner},
    transports::http::reqwest::Url,
};
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    WalletError,
    events::{WalletEvents, WalletEventSenders},
    provider::WalletProvider,
};
use crate::{
    chain::{BlockchainProvider, NetworkDescriptor},
    types::ChainId,
};

/// Headless wallet backed by a local private key.
///
/// Stands in for an injected browser wallet when the client runs without one:
/// the key is pre-authorized, and the set of chains the wallet "knows" starts
/// from the descriptors it was constructed with. Switching to a chain outside
/// that set fails with [`WalletError::UnrecognizedChain`] until the chain is
/// registered via `add_chain`, mirroring provider code 4902 behavior.
pub struct KeyedWallet {
    signer: PrivateKeySigner,
    state: Mutex<KeyedState>,
    events: WalletEventSenders,
}

struct KeyedState {
    /// Chains the wallet knows, keyed by id, with their RPC endpoints.
    chains: BTreeMap<ChainId, String>,
    active: ChainId,
}

impl KeyedWallet {
    /// Build a wallet that knows the given chains, with `active` selected.
    pub fn new(
        private_key: &str,
        descriptors: &[NetworkDescriptor],
        active: ChainId,
    ) -> Result<Self, WalletError> {
        let signer = signer_from_private_key(private_key)?;

        let mut chains = BTreeMap::new();
        for descriptor in descriptors {
            chains.insert(descriptor.chain_id, descriptor.rpc_url.to_string());
        }
        if !chains.contains_key(&active) {
            return Err(WalletError::UnrecognizedChain { chain_id: active });
        }

        let events = WalletEventSenders::new(vec![signer.address()], active);
        Ok(Self {
            signer,
            state: Mutex::new(KeyedState { chains, active }),
            events,
        })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

fn signer_from_private_key(private_key: &str) -> Result<PrivateKeySigner, WalletError> {
    private_key
        .parse()
        .map_err(|e: LocalSignerError| WalletError::InvalidPrivateKey {
            key_length: private_key.len(),
            source: e,
        })
}

#[async_trait]
impl WalletProvider for KeyedWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        // A key-backed wallet has nothing to prompt for.
        self.accounts().await
    }

    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.signer.address()])
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        Ok(self.state.lock().await.active)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError> {
        let mut state = self.state.lock().await;
        if !state.chains.contains_key(&chain_id) {
            return Err(WalletError::UnrecognizedChain { chain_id });
        }
        state.active = chain_id;
        drop(state);

        self.events.chain_changed(chain_id);
        Ok(())
    }

    async fn add_chain(&self, descriptor: &NetworkDescriptor) -> Result<(), WalletError> {
        let mut state = self.state.lock().await;
        state
            .chains
            .insert(descriptor.chain_id, descriptor.rpc_url.to_string());
        state.active = descriptor.chain_id;
        drop(state);

        tracing::info!(
            chain_id = %descriptor.chain_id,
            chain_name = descriptor.chain_name,
            "Registered chain with keyed wallet"
        );
        self.events.chain_changed(descriptor.chain_id);
        Ok(())
    }

    async fn signer_provider(&self) -> Result<BlockchainProvider, WalletError> {
        let state = self.state.lock().await;
        let active = state.active;
        let rpc_url = state
            .chains
            .get(&active)
            .cloned()
            .ok_or(WalletError::UnrecognizedChain { chain_id: active })?;
        drop(state);

        let url: Url = rpc_url.parse().map_err(|e| WalletError::ProviderInit {
            reason: format!("invalid RPC URL '{rpc_url}': {e}"),
        })?;

        let wallet = EthereumWallet::from(self.signer.clone());
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);
        Ok(Arc::new(provider.erased()))
    }

    fn subscribe(&self) -> WalletEvents {
        self.events.subscribe()
    }
}
