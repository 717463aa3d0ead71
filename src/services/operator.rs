use std::sync::Arc;

use alloy::primitives::U256;

use super::{OperationSummary, ServiceError, connected_address, finalize, payment_decimals};
use crate::{
    backend::{BackendApi, Credentials},
    chain::{
        ChainError, ChainManager,
        utils::{format_token_amount, parse_token_amount},
    },
    session_store::SessionStore,
    types::{Role, TxRecord},
    wallet::WalletSession,
};

/// Node-operator dashboard operations.
///
/// Collateral amounts cross this boundary as user-entered decimal strings
/// and are parsed against the payment token's live decimals.
pub struct OperatorService {
    session: Arc<WalletSession>,
    chain: Arc<ChainManager>,
    backend: Arc<dyn BackendApi>,
    store: Arc<SessionStore>,
}

impl OperatorService {
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
    /// together with the node-operator role.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        let token = self.backend.operator_login(credentials).await?;
        self.store.save_token(token).await?;
        self.store.save_role(Role::NodeOperator).await?;
        tracing::info!("Node-operator portal login succeeded");
        Ok(())
    }

    /// Lock collateral: payment-token approval, then the deposit itself.
    ///
    /// Both transactions are awaited to confirmation. The contract set is
    /// re-checked against the wallet's live chain between the two, so a
    /// network switch during the approval aborts the deposit instead of
    /// sending it through stale handles.
    pub async fn deposit_collateral(
        &self,
        amount: &str,
    ) -> Result<OperationSummary, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let contracts = self.chain.resolve_contracts().await?;

        let decimals = payment_decimals(&contracts).await?;
        let value = parse_token_amount(amount, decimals)?;

        self.chain
            .handle_contract_call(
                contracts.chain_id(),
                "collateral-approve",
                contracts
                    .payment_token()
                    .approve(*contracts.verification().address(), value)
                    .send()
                    .await,
            )
            .await?;

        let active = self
            .session
            .chain_id()
            .await
            .ok_or(ChainError::UnsupportedNetwork { chain_id: None })?;
        contracts.ensure_chain(active)?;

        let receipt = self
            .chain
            .handle_contract_call(
                contracts.chain_id(),
                "deposit-collateral",
                contracts.verification().depositCollateral(value).send().await,
            )
            .await?;

        let tx_hash = format!("{:#x}", receipt.transaction_hash);
        let record = TxRecord {
            tx_hash: tx_hash.clone(),
            chain_id: contracts.chain_id(),
            actor: format!("{actor:#x}"),
            action: "deposit-collateral".to_string(),
            amount: value.to_string(),
        };

        Ok(finalize(
            contracts.chain_id(),
            "deposit-collateral",
            tx_hash,
            async { self.backend.record_transaction(&record).await },
        )
        .await)
    }

    /// Release previously locked collateral.
    pub async fn withdraw_collateral(
        &self,
        amount: &str,
    ) -> Result<OperationSummary, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let contracts = self.chain.resolve_contracts().await?;

        let decimals = payment_decimals(&contracts).await?;
        let value = parse_token_amount(amount, decimals)?;

        let receipt = self
            .chain
            .handle_contract_call(
                contracts.chain_id(),
                "withdraw-collateral",
                contracts
                    .verification()
                    .withdrawCollateral(value)
                    .send()
                    .await,
            )
            .await?;

        let tx_hash = format!("{:#x}", receipt.transaction_hash);
        let record = TxRecord {
            tx_hash: tx_hash.clone(),
            chain_id: contracts.chain_id(),
            actor: format!("{actor:#x}"),
            action: "withdraw-collateral".to_string(),
            amount: value.to_string(),
        };

        Ok(finalize(
            contracts.chain_id(),
            "withdraw-collateral",
            tx_hash,
            async { self.backend.record_transaction(&record).await },
        )
        .await)
    }

    /// Mark an estate as verified on-chain, then mirror the status.
    pub async fn verify_estate(&self, estate_id: u64) -> Result<OperationSummary, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let contracts = self.chain.resolve_contracts().await?;

        let receipt = self
            .chain
            .handle_contract_call(
                contracts.chain_id(),
                "verify-estate",
                contracts
                    .verification()
                    .verifyEstate(U256::from(estate_id))
                    .send()
                    .await,
            )
            .await?;

        let tx_hash = format!("{:#x}", receipt.transaction_hash);
        let record = TxRecord {
            tx_hash: tx_hash.clone(),
            chain_id: contracts.chain_id(),
            actor: format!("{actor:#x}"),
            action: "verify-estate".to_string(),
            amount: "0".to_string(),
        };

        Ok(finalize(
            contracts.chain_id(),
            "verify-estate",
            tx_hash,
            async {
                self.backend.update_estate_status(estate_id, true).await?;
                self.backend.record_transaction(&record).await
            },
        )
        .await)
    }

    /// Claim accrued verification rewards.
    ///
    /// The reward balance is read before the claim so the transaction log
    /// records the amount that was actually available.
    pub async fn claim_rewards(&self) -> Result<OperationSummary, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let contracts = self.chain.resolve_contracts().await?;

        let amount = contracts
            .verification()
            .rewardsOf(actor)
            .call()
            .await
            .map_err(ChainError::from)?;

        let receipt = self
            .chain
            .handle_contract_call(
                contracts.chain_id(),
                "claim-rewards",
                contracts.verification().claimRewards().send().await,
            )
            .await?;

        let tx_hash = format!("{:#x}", receipt.transaction_hash);
        let record = TxRecord {
            tx_hash: tx_hash.clone(),
            chain_id: contracts.chain_id(),
            actor: format!("{actor:#x}"),
            action: "claim-rewards".to_string(),
            amount: amount.to_string(),
        };

        Ok(finalize(contracts.chain_id(), "claim-rewards", tx_hash, async {
            self.backend.record_transaction(&record).await
        })
        .await)
    }

    /// Collateral currently locked for the connected operator, formatted in
    /// payment-token units.
    pub async fn collateral(&self) -> Result<String, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let contracts = self.chain.resolve_contracts().await?;

        let decimals = payment_decimals(&contracts).await?;
        let value = contracts
            .verification()
            .collateralOf(actor)
            .call()
            .await
            .map_err(ChainError::from)?;
        Ok(format_token_amount(value, decimals))
    }

    /// Unclaimed rewards for the connected operator, formatted in
    /// payment-token units.
    pub async fn rewards(&self) -> Result<String, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let contracts = self.chain.resolve_contracts().await?;

        let decimals = payment_decimals(&contracts).await?;
        let value = contracts
            .verification()
            .rewardsOf(actor)
            .call()
            .await
            .map_err(ChainError::from)?;
        Ok(format_token_amount(value, decimals))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use alloy::primitives::Address;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        backend::fake::FakeBackend,
        config::ChainConfigRaw,
        types::{ChainId, SEPOLIA},
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
    ) -> OperatorService {
        let config = ChainConfigRaw::default().resolve().unwrap();
        let chain = Arc::new(ChainManager::new(config, Arc::clone(&session)).unwrap());
        OperatorService::new(session, chain, backend, store)
    }

    #[tokio::test]
    async fn login_persists_token_and_role() {
        let dir = TempDir::new().unwrap();
        let store = session_store(&dir).await;
        let backend = FakeBackend::new();
        let operator = service(
            Arc::new(WalletSession::new(None)),
            Arc::clone(&backend),
            Arc::clone(&store),
        );

        let credentials = Credentials {
            username: "node-1".to_string(),
            password: "hunter2".to_string(),
        };
        operator.login(&credentials).await.unwrap();

        assert_eq!(store.token().await, Some("fake-token".to_string()));
        assert_eq!(store.role().await, Some(Role::NodeOperator));
        assert_eq!(backend.calls().await, vec!["operator-login"]);
    }

    #[tokio::test]
    async fn deposit_refuses_without_a_connection() {
        let dir = TempDir::new().unwrap();
        let backend = FakeBackend::new();
        let operator = service(
            Arc::new(WalletSession::new(None)),
            Arc::clone(&backend),
            session_store(&dir).await,
        );

        let result = operator.deposit_collateral("100").await;
        assert!(matches!(result, Err(ServiceError::NotConnected)));
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn deposit_on_mainnet_reports_unsupported_network() {
        let dir = TempDir::new().unwrap();
        let backend = FakeBackend::new();
        let wallet = FakeWallet::new(vec![Address::repeat_byte(0x22)], ChainId::new(1));
        let session = Arc::new(WalletSession::new(Some(wallet.clone())));
        session.connect().await.unwrap();
        let operator = service(session, Arc::clone(&backend), session_store(&dir).await);

        let error = operator.deposit_collateral("100").await.err().unwrap();
        assert!(error.to_string().contains("Unsupported network"));
        assert_eq!(wallet.provider_calls(), 0);
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn failed_verify_leaves_the_backend_untouched() {
        let dir = TempDir::new().unwrap();
        let backend = FakeBackend::new();
        let wallet = FakeWallet::new(vec![Address::repeat_byte(0x22)], SEPOLIA);
        let session = Arc::new(WalletSession::new(Some(wallet)));
        session.connect().await.unwrap();
        let operator = service(session, Arc::clone(&backend), session_store(&dir).await);

        let result = operator.verify_estate(7).await;
        assert!(result.is_err());
        assert!(backend.calls().await.is_empty());
    }
}
