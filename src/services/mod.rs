pub(crate) mod admin;
mod error;
pub(crate) mod investor;
pub(crate) mod operator;
pub(crate) mod owner;

use std::{future::Future, sync::Arc};

pub use admin::AdminService;
use alloy::primitives::Address;
pub use error::ServiceError;
pub use investor::{InvestorService, PositionDrift};
pub use operator::OperatorService;
pub use owner::OwnerService;

use crate::{
    backend::{BackendApi, BackendError},
    chain::{ChainError, ChainManager, ContractSet},
    session_store::SessionStore,
    types::ChainId,
    wallet::WalletSession,
};

/// Outcome of a confirmed state-changing flow.
///
/// `drift` is true when the chain confirmed the transaction but the backend
/// records did not follow; the on-chain change itself stands either way.
#[derive(Debug, Clone)]
pub struct OperationSummary {
    pub tx_hash: String,
    pub chain_id: ChainId,
    pub drift: bool,
}

/// Container for all initialized role services.
pub struct Services {
    pub admin: Arc<AdminService>,
    pub operator: Arc<OperatorService>,
    pub owner: Arc<OwnerService>,
    pub investor: Arc<InvestorService>,
}

/// Initialize all services.
///
/// Services depend only on the session, chain manager, backend, and session
/// store; the context wires them together and owns nothing else.
pub(crate) fn initialize(
    session: &Arc<WalletSession>,
    chain: &Arc<ChainManager>,
    backend: &Arc<dyn BackendApi>,
    store: &Arc<SessionStore>,
) -> Services {
    Services {
        admin: Arc::new(AdminService::new(
            Arc::clone(session),
            Arc::clone(chain),
            Arc::clone(backend),
            Arc::clone(store),
        )),
        operator: Arc::new(OperatorService::new(
            Arc::clone(session),
            Arc::clone(chain),
            Arc::clone(backend),
            Arc::clone(store),
        )),
        owner: Arc::new(OwnerService::new(
            Arc::clone(session),
            Arc::clone(chain),
            Arc::clone(backend),
            Arc::clone(store),
        )),
        investor: Arc::new(InvestorService::new(
            Arc::clone(session),
            Arc::clone(chain),
            Arc::clone(backend),
        )),
    }
}

/// Resolve the connected account or refuse the operation.
pub(crate) async fn connected_address(session: &WalletSession) -> Result<Address, ServiceError> {
    session.address().await.ok_or(ServiceError::NotConnected)
}

/// Payment-token decimals, read live for parsing user-entered amounts.
pub(crate) async fn payment_decimals(contracts: &ContractSet) -> Result<u8, ChainError> {
    let decimals = contracts.payment_token().decimals().call().await?;
    Ok(decimals)
}

/// Apply backend bookkeeping after an on-chain confirmation.
///
/// The chain already moved. A bookkeeping failure is logged and surfaced as
/// drift on the summary; nothing is retried or rolled back.
pub(crate) async fn finalize(
    chain_id: ChainId,
    action: &str,
    tx_hash: String,
    bookkeeping: impl Future<Output = Result<(), BackendError>>,
) -> OperationSummary {
    match bookkeeping.await {
        Ok(()) => OperationSummary {
            tx_hash,
            chain_id,
            drift: false,
        },
        Err(error) => {
            tracing::warn!(
                action,
                tx_hash = %tx_hash,
                error = %error,
                "Backend bookkeeping failed after a confirmed transaction; records drifted"
            );
            OperationSummary {
                tx_hash,
                chain_id,
                drift: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::{backend::fake::FakeBackend, types::FUJI};

    #[tokio::test]
    async fn connected_address_refuses_without_a_session() {
        let session = WalletSession::new(None);
        let result = connected_address(&session).await;
        assert!(matches!(result, Err(ServiceError::NotConnected)));
    }

    #[tokio::test]
    async fn finalize_reports_clean_bookkeeping() {
        let backend = FakeBackend::new();
        let record = crate::types::TxRecord {
            tx_hash: "0xabc".to_string(),
            chain_id: FUJI,
            actor: "0x1".to_string(),
            action: "verify-estate".to_string(),
            amount: "0".to_string(),
        };

        let summary = finalize(FUJI, "verify-estate", "0xabc".to_string(), async {
            backend.record_transaction(&record).await
        })
        .await;

        assert!(!summary.drift);
        assert_eq!(summary.tx_hash, "0xabc");
        assert_eq!(backend.calls().await, vec!["tx-record"]);
    }

    #[tokio::test]
    async fn finalize_flags_drift_when_bookkeeping_fails() {
        let backend = FakeBackend::new();
        backend.fail_writes().await;
        let record = crate::types::TxRecord {
            tx_hash: "0xdef".to_string(),
            chain_id: FUJI,
            actor: "0x1".to_string(),
            action: "claim-rewards".to_string(),
            amount: "0".to_string(),
        };

        let summary = finalize(FUJI, "claim-rewards", "0xdef".to_string(), async {
            backend.record_transaction(&record).await
        })
        .await;

        assert!(summary.drift);
        assert_eq!(summary.tx_hash, "0xdef");
        assert!(backend.recorded_transactions().await.is_empty());
    }

    #[tokio::test]
    async fn finalize_applies_writes_in_order() {
        let backend = FakeBackend::new();
        backend
            .push_operator(crate::types::OperatorProfile {
                address: "0xAA".to_string(),
                name: "Node One".to_string(),
                approved: false,
                collateral: "0".to_string(),
            })
            .await;
        let record = crate::types::TxRecord {
            tx_hash: "0x2".to_string(),
            chain_id: FUJI,
            actor: "0xaa".to_string(),
            action: "approve-operator".to_string(),
            amount: "0".to_string(),
        };

        let summary = finalize(FUJI, "approve-operator", "0x2".to_string(), async {
            backend.update_operator_status("0xaa", true).await?;
            backend.record_transaction(&record).await
        })
        .await;

        assert!(!summary.drift);
        assert_eq!(backend.calls().await, vec!["operator-status", "tx-record"]);
        // The mirror row is matched case-insensitively.
        assert!(backend.stored_operators().await[0].approved);
    }

    #[tokio::test]
    async fn finalize_stops_at_the_first_failed_write() {
        let backend = FakeBackend::new();
        backend.fail_writes().await;

        let summary = finalize(FUJI, "approve-operator", "0x1".to_string(), async {
            backend.update_operator_status("0xaa", true).await?;
            let record = crate::types::TxRecord {
                tx_hash: "0x1".to_string(),
                chain_id: FUJI,
                actor: "0xaa".to_string(),
                action: "approve-operator".to_string(),
                amount: "0".to_string(),
            };
            backend.record_transaction(&record).await
        })
        .await;

        assert!(summary.drift);
        // The second write is never attempted once the first fails.
        assert_eq!(backend.calls().await, vec!["operator-status"]);
    }
}
