//! Per-chain contract resolution.
//!
//! The registry describes the supported networks and their deployments; the
//! manager turns the wallet's *current* chain into a freshly bound
//! [`ContractSet`]. Nothing here caches across chain switches.

mod contracts;
mod error;
mod registry;
pub mod utils;

use std::{sync::Arc, time::Instant};

use alloy::{
    contract::Error as ContractError,
    network::Ethereum,
    providers::{DynProvider, PendingTransactionBuilder},
    rpc::types::TransactionReceipt,
};
pub use contracts::{ContractSet, EstateRegistry, PaymentToken, TokenizationManager, Verification};
pub use error::ChainError;
pub use registry::{ChainRegistry, Deployment, NativeCurrency, NetworkDescriptor};

use crate::{config::ChainConfig, observability, types::ChainId, wallet::WalletSession};

/// Signer-bound provider shared by every handle in one [`ContractSet`].
pub type BlockchainProvider = Arc<DynProvider<Ethereum>>;

/// Resolves the wallet's active chain into bound contract handles.
pub struct ChainManager {
    registry: ChainRegistry,
    session: Arc<WalletSession>,
    config: ChainConfig,
}

impl ChainManager {
    pub fn new(config: ChainConfig, session: Arc<WalletSession>) -> Result<Self, ChainError> {
        Ok(Self {
            registry: ChainRegistry::new()?,
            session,
            config,
        })
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn session(&self) -> &Arc<WalletSession> {
        &self.session
    }

    /// Resolve a [`ContractSet`] for the wallet's active chain.
    ///
    /// No wallet and an unsupported chain id are the same failure shape, and
    /// in both cases no provider is built and no contract is instantiated.
    /// On a supported chain every call builds a fresh signer-bound provider
    /// and binds all four handles against it.
    pub async fn resolve_contracts(&self) -> Result<ContractSet, ChainError> {
        let Some(wallet) = self.session.wallet() else {
            return Err(ChainError::UnsupportedNetwork { chain_id: None });
        };

        let chain_id = wallet.chain_id().await?;
        let Some(deployment) = self.registry.deployment(chain_id) else {
            tracing::warn!(chain_id = %chain_id, "Active chain is not supported");
            return Err(ChainError::UnsupportedNetwork {
                chain_id: Some(chain_id),
            });
        };

        let provider = wallet.signer_provider().await?;
        tracing::debug!(chain_id = %chain_id, "Bound fresh contract set");
        Ok(ContractSet::bind(chain_id, deployment, provider))
    }

    /// Await the receipt for a pending transaction with the configured
    /// confirmations and timeout. A receipt with a failed status is an error;
    /// callers must never treat a reverted transaction as success.
    pub(crate) async fn handle_contract_call(
        &self,
        chain_id: ChainId,
        operation: &str,
        result: Result<PendingTransactionBuilder<Ethereum>, ContractError>,
    ) -> Result<TransactionReceipt, ChainError> {
        let started = Instant::now();
        match result {
            Ok(pending_tx) => {
                let pending_tx = pending_tx
                    .with_required_confirmations(self.config.tx_confirmations())
                    .with_timeout(self.config.tx_receipt_timeout());

                match pending_tx.get_receipt().await {
                    Ok(receipt) if receipt.status() => {
                        observability::record_tx_stage(
                            chain_id,
                            operation,
                            "receipt",
                            "confirmed",
                            started.elapsed(),
                        );
                        Ok(receipt)
                    }
                    Ok(receipt) => {
                        observability::record_tx_stage(
                            chain_id,
                            operation,
                            "receipt",
                            "reverted",
                            started.elapsed(),
                        );
                        let tx_hash = format!("{:#x}", receipt.transaction_hash);
                        tracing::error!(tx_hash = %tx_hash, operation, "Transaction reverted on-chain");
                        Err(ChainError::Reverted { tx_hash })
                    }
                    Err(err) => {
                        observability::record_tx_stage(
                            chain_id,
                            operation,
                            "receipt",
                            "failed",
                            started.elapsed(),
                        );
                        tracing::error!(operation, "Failed to retrieve transaction receipt: {:?}", err);
                        Err(ChainError::ReceiptFailed {
                            reason: err.to_string(),
                        })
                    }
                }
            }
            Err(err) => {
                observability::record_tx_stage(
                    chain_id,
                    operation,
                    "send",
                    "failed",
                    started.elapsed(),
                );
                tracing::error!(operation, "Contract call failed: {:?}", err);
                Err(ChainError::Contract(err))
            }
        }
    }
}
