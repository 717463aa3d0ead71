//! Scriptable wallet used by tests.

#![allow(clippy::unwrap_used)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
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

/// A wallet whose accounts, chain, and failures are driven by the test.
///
/// `signer_provider` builds a real (never-dialed) provider against a local
/// URL and counts invocations, so tests can assert that a code path touched
/// the chain zero times.
pub(crate) struct FakeWallet {
    state: Mutex<FakeState>,
    events: WalletEventSenders,
    provider_calls: AtomicUsize,
    signer: PrivateKeySigner,
}

struct FakeState {
    accounts: Vec<Address>,
    chain: ChainId,
    known_chains: Vec<ChainId>,
    added: Vec<NetworkDescriptor>,
    next_request_error: Option<WalletError>,
    next_accounts_error: Option<WalletError>,
}

impl FakeWallet {
    pub(crate) fn new(accounts: Vec<Address>, chain: ChainId) -> Arc<Self> {
        let events = WalletEventSenders::new(accounts.clone(), chain);
        Arc::new(Self {
            state: Mutex::new(FakeState {
                accounts,
                chain,
                known_chains: vec![chain],
                added: Vec::new(),
                next_request_error: None,
                next_accounts_error: None,
            }),
            events,
            provider_calls: AtomicUsize::new(0),
            signer: PrivateKeySigner::random(),
        })
    }

    /// Script the account list and fire `accountsChanged`.
    pub(crate) async fn set_accounts(&self, accounts: Vec<Address>) {
        self.state.lock().await.accounts = accounts.clone();
        self.events.accounts_changed(accounts);
    }

    /// Script the active chain and fire `chainChanged`.
    pub(crate) async fn set_chain(&self, chain_id: ChainId) {
        let mut state = self.state.lock().await;
        state.chain = chain_id;
        if !state.known_chains.contains(&chain_id) {
            state.known_chains.push(chain_id);
        }
        drop(state);
        self.events.chain_changed(chain_id);
    }

    pub(crate) async fn fail_next_request(&self, error: WalletError) {
        self.state.lock().await.next_request_error = Some(error);
    }

    pub(crate) async fn fail_next_accounts(&self, error: WalletError) {
        self.state.lock().await.next_accounts_error = Some(error);
    }

    /// Descriptors passed to `add_chain`, in call order.
    pub(crate) async fn added_chains(&self) -> Vec<NetworkDescriptor> {
        self.state.lock().await.added.clone()
    }

    /// How many times `signer_provider` was invoked.
    pub(crate) fn provider_calls(&self) -> usize {
        self.provider_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        let mut state = self.state.lock().await;
        if let Some(error) = state.next_request_error.take() {
            return Err(error);
        }
        Ok(state.accounts.clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        let mut state = self.state.lock().await;
        if let Some(error) = state.next_accounts_error.take() {
            return Err(error);
        }
        Ok(state.accounts.clone())
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        Ok(self.state.lock().await.chain)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), WalletError> {
        let mut state = self.state.lock().await;
        if !state.known_chains.contains(&chain_id) {
            return Err(WalletError::UnrecognizedChain { chain_id });
        }
        state.chain = chain_id;
        drop(state);
        self.events.chain_changed(chain_id);
        Ok(())
    }

    async fn add_chain(&self, descriptor: &NetworkDescriptor) -> Result<(), WalletError> {
        let mut state = self.state.lock().await;
        state.added.push(*descriptor);
        if !state.known_chains.contains(&descriptor.chain_id) {
            state.known_chains.push(descriptor.chain_id);
        }
        state.chain = descriptor.chain_id;
        drop(state);
        self.events.chain_changed(descriptor.chain_id);
        Ok(())
    }

    async fn signer_provider(&self) -> Result<BlockchainProvider, WalletError> {
        self.provider_calls.fetch_add(1, Ordering::SeqCst);
        let wallet = EthereumWallet::from(self.signer.clone());
        // Port 1 never serves RPC, so any code path that dials fails fast.
        let url = "http://127.0.0.1:1".parse().unwrap();
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);
        Ok(Arc::new(provider.erased()))
    }

    fn subscribe(&self) -> WalletEvents {
        self.events.subscribe()
    }
}
