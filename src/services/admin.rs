use std::sync::Arc;

use alloy::primitives::Address;

use super::{OperationSummary, ServiceError, connected_address, finalize};
use crate::{
    backend::{BackendApi, Credentials},
    chain::ChainManager,
    session_store::SessionStore,
    types::{OperatorProfile, Role, TxRecord},
    wallet::WalletSession,
};

/// Platform-admin dashboard operations.
pub struct AdminService {
    session: Arc<WalletSession>,
    chain: Arc<ChainManager>,
    backend: Arc<dyn BackendApi>,
    store: Arc<SessionStore>,
}

impl AdminService {
    pub(crate) fn new(
        session: Arc<WalletSession>,
        chain: Arc<ChainManager>,
        backend: Arc<dyn BackendApi>,
        store: Arc<SessionStore>,
    ) -> Self {
        Self {
            session,
            chain,
            backend,
            store,
        }
    }

    /// Exchange portal credentials for a bearer token and persist it
    /// together with the admin role.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        let token = self.backend.admin_login(credentials).await?;
        self.store.save_token(token).await?;
        self.store.save_role(Role::Admin).await?;
        tracing::info!("Admin portal login succeeded");
        Ok(())
    }

    /// Operator roster from the backend, enriched with live on-chain
    /// approval flags.
    ///
    /// Chain reads are best-effort here; a failed read keeps the mirrored
    /// flag so the roster still renders.
    pub async fn load_operators(&self) -> Result<Vec<OperatorProfile>, ServiceError> {
        let mut operators = self.backend.operators().await?;

        let contracts = match self.chain.resolve_contracts().await {
            Ok(contracts) => contracts,
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "Serving operator roster from the backend mirror only"
                );
                return Ok(operators);
            }
        };

        for operator in &mut operators {
            let Ok(address) = operator.address.parse::<Address>() else {
                tracing::warn!(
                    address = %operator.address,
                    "Operator row carries an unparseable address"
                );
                continue;
            };
            match contracts
                .verification()
                .isApprovedOperator(address)
                .call()
                .await
            {
                Ok(approved) => operator.approved = approved,
                Err(error) => {
                    tracing::warn!(
                        address = %operator.address,
                        error = %error,
                        "On-chain approval read failed; keeping the mirrored flag"
                    );
                }
            }
        }

        Ok(operators)
    }

    /// Approve a node operator on-chain, then mirror the status.
    ///
    /// The backend PATCH runs only after the transaction is confirmed; a
    /// PATCH failure surfaces as drift, not as an error.
    pub async fn approve_operator(
        &self,
        operator: Address,
    ) -> Result<OperationSummary, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let contracts = self.chain.resolve_contracts().await?;

        let receipt = self
            .chain
            .handle_contract_call(
                contracts.chain_id(),
                "approve-operator",
                contracts
                    .verification()
                    .approveOperator(operator)
                    .send()
                    .await,
            )
            .await?;

        let tx_hash = format!("{:#x}", receipt.transaction_hash);
        let record = TxRecord {
            tx_hash: tx_hash.clone(),
            chain_id: contracts.chain_id(),
            actor: format!("{actor:#x}"),
            action: "approve-operator".to_string(),
            amount: "0".to_string(),
        };

        Ok(finalize(
            contracts.chain_id(),
            "approve-operator",
            tx_hash,
            async {
                self.backend
                    .update_operator_status(&format!("{operator:#x}"), true)
                    .await?;
                self.backend.record_transaction(&record).await
            },
        )
        .await)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use tempfile::TempDir;

    use super::*;
    use crate::{
        backend::fake::FakeBackend,
        config::ChainConfigRaw,
        types::{ChainId, FUJI},
        wallet::fake::FakeWallet,
    };

    async fn session_store(dir: &TempDir) -> Arc<SessionStore> {
        Arc::new(
            SessionStore::load(&dir.path().join("session.json"))
                .await
                .unwrap(),
        )
    }

    fn service(
        session: Arc<WalletSession>,
        backend: Arc<FakeBackend>,
        store: Arc<SessionStore>,
    ) -> AdminService {
        let config = ChainConfigRaw::default().resolve().unwrap();
        let chain = Arc::new(ChainManager::new(config, Arc::clone(&session)).unwrap());
        AdminService::new(session, chain, backend, store)
    }

    fn operator_row(address: &str, approved: bool) -> OperatorProfile {
        OperatorProfile {
            address: address.to_string(),
            name: "Node One".to_string(),
            approved,
            collateral: "0".to_string(),
        }
    }

    #[tokio::test]
    async fn login_persists_token_and_role() {
        let dir = TempDir::new().unwrap();
        let store = session_store(&dir).await;
        let backend = FakeBackend::new();
        let admin = service(
            Arc::new(WalletSession::new(None)),
            Arc::clone(&backend),
            Arc::clone(&store),
        );

        let credentials = Credentials {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        admin.login(&credentials).await.unwrap();

        assert_eq!(store.token().await, Some("fake-token".to_string()));
        assert_eq!(store.role().await, Some(Role::Admin));
    }

    #[tokio::test]
    async fn approve_refuses_without_a_connection() {
        let dir = TempDir::new().unwrap();
        let backend = FakeBackend::new();
        let admin = service(
            Arc::new(WalletSession::new(None)),
            Arc::clone(&backend),
            session_store(&dir).await,
        );

        let result = admin.approve_operator(Address::repeat_byte(0xaa)).await;
        assert!(matches!(result, Err(ServiceError::NotConnected)));
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn approve_on_mainnet_reports_unsupported_network() {
        let dir = TempDir::new().unwrap();
        let backend = FakeBackend::new();
        let wallet = FakeWallet::new(vec![Address::repeat_byte(0x11)], ChainId::new(1));
        let session = Arc::new(WalletSession::new(Some(wallet.clone())));
        session.connect().await.unwrap();
        let admin = service(session, Arc::clone(&backend), session_store(&dir).await);

        let error = admin
            .approve_operator(Address::repeat_byte(0xaa))
            .await
            .err()
            .unwrap();

        assert!(error.to_string().contains("Unsupported network"));
        assert_eq!(wallet.provider_calls(), 0);
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn failed_send_leaves_the_backend_untouched() {
        let dir = TempDir::new().unwrap();
        let backend = FakeBackend::new();
        let wallet = FakeWallet::new(vec![Address::repeat_byte(0x11)], FUJI);
        let session = Arc::new(WalletSession::new(Some(wallet)));
        session.connect().await.unwrap();
        let admin = service(session, Arc::clone(&backend), session_store(&dir).await);

        // The fake wallet's provider dials a port nothing serves, so the
        // send fails before any confirmation.
        let result = admin.approve_operator(Address::repeat_byte(0xaa)).await;
        assert!(result.is_err());
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn roster_falls_back_to_the_mirror_without_a_wallet() {
        let dir = TempDir::new().unwrap();
        let backend = FakeBackend::new();
        backend.push_operator(operator_row("0xaa", false)).await;
        backend.push_operator(operator_row("0xbb", true)).await;
        let admin = service(
            Arc::new(WalletSession::new(None)),
            Arc::clone(&backend),
            session_store(&dir).await,
        );

        let roster = admin.load_operators().await.unwrap();
        assert_eq!(roster.len(), 2);
        assert!(!roster[0].approved);
        assert!(roster[1].approved);
    }
}
