use std::sync::Arc;

use alloy::primitives::U256;

use super::{OperationSummary, ServiceError, connected_address, finalize, payment_decimals};
use crate::{
    backend::BackendApi,
    chain::{ChainManager, utils::parse_token_amount},
    session_store::SessionStore,
    types::{EstateRecord, OwnerProfile, Role, TokenListing, TxRecord},
    wallet::WalletSession,
};

/// Estate-owner dashboard operations.
pub struct OwnerService {
    session: Arc<WalletSession>,
    chain: Arc<ChainManager>,
    backend: Arc<dyn BackendApi>,
    store: Arc<SessionStore>,
}

impl OwnerService {
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

    /// Register the connected wallet as an estate owner.
    ///
    /// Registration is backend bookkeeping only; no transaction is sent.
    /// The profile is keyed by the connected address, and the estate-owner
    /// role is persisted on success.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        kyc_document: &str,
    ) -> Result<(), ServiceError> {
        let actor = connected_address(&self.session).await?;
        let profile = OwnerProfile {
            address: format!("{actor:#x}"),
            name: name.to_string(),
            email: email.to_string(),
            kyc_document: kyc_document.to_string(),
        };

        self.backend.register_estate_owner(&profile).await?;
        self.store.save_role(Role::EstateOwner).await?;
        tracing::info!(address = %profile.address, "Estate owner registered");
        Ok(())
    }

    /// The connected wallet's owner profile, if one is registered.
    pub async fn profile(&self) -> Result<Option<OwnerProfile>, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let profile = self.backend.estate_owner(&format!("{actor:#x}")).await?;
        Ok(profile)
    }

    /// Register an estate on-chain, then record it for display.
    ///
    /// Metadata travels on-chain as an inline JSON document; the valuation
    /// is parsed against the payment token's live decimals.
    pub async fn submit_estate(
        &self,
        name: &str,
        location: &str,
        valuation: &str,
    ) -> Result<OperationSummary, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let contracts = self.chain.resolve_contracts().await?;

        let decimals = payment_decimals(&contracts).await?;
        let value = parse_token_amount(valuation, decimals)?;
        let metadata = serde_json::json!({ "name": name, "location": location }).to_string();

        let receipt = self
            .chain
            .handle_contract_call(
                contracts.chain_id(),
                "register-estate",
                contracts
                    .estate_registry()
                    .registerEstate(metadata, value)
                    .send()
                    .await,
            )
            .await?;

        let tx_hash = format!("{:#x}", receipt.transaction_hash);

        // The new id is the tail of the owner's estate list. If that read
        // fails, the backend rows cannot be written accurately; the summary
        // reports it as the same drift a failed write would.
        let estate_id = match contracts.estate_registry().estatesOf(actor).call().await {
            Ok(ids) => ids.last().and_then(|id| u64::try_from(*id).ok()),
            Err(error) => {
                tracing::warn!(error = %error, "Estate id read failed after registration");
                None
            }
        };
        let Some(estate_id) = estate_id else {
            tracing::warn!(
                tx_hash = %tx_hash,
                "Estate registered on-chain without a backend record"
            );
            return Ok(OperationSummary {
                tx_hash,
                chain_id: contracts.chain_id(),
                drift: true,
            });
        };

        let estate = EstateRecord {
            estate_id,
            owner: format!("{actor:#x}"),
            name: name.to_string(),
            location: location.to_string(),
            valuation: value.to_string(),
            verified: false,
            tokenized: false,
        };
        let record = TxRecord {
            tx_hash: tx_hash.clone(),
            chain_id: contracts.chain_id(),
            actor: format!("{actor:#x}"),
            action: "register-estate".to_string(),
            amount: "0".to_string(),
        };

        Ok(finalize(
            contracts.chain_id(),
            "register-estate",
            tx_hash,
            async {
                self.backend.create_estate(&estate).await?;
                self.backend.record_transaction(&record).await
            },
        )
        .await)
    }

    /// Open a tokenization listing for a verified estate.
    ///
    /// Supply is a whole token count; the price is per token in
    /// payment-token units.
    pub async fn request_tokenization(
        &self,
        estate_id: u64,
        supply: &str,
        price_per_token: &str,
    ) -> Result<OperationSummary, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let contracts = self.chain.resolve_contracts().await?;

        let supply_value = parse_token_amount(supply, 0)?;
        let decimals = payment_decimals(&contracts).await?;
        let price_value = parse_token_amount(price_per_token, decimals)?;

        let receipt = self
            .chain
            .handle_contract_call(
                contracts.chain_id(),
                "create-listing",
                contracts
                    .tokenization_manager()
                    .createListing(U256::from(estate_id), supply_value, price_value)
                    .send()
                    .await,
            )
            .await?;

        let tx_hash = format!("{:#x}", receipt.transaction_hash);
        let listing = TokenListing {
            estate_id,
            supply: supply_value.to_string(),
            remaining: supply_value.to_string(),
            price_per_token: price_value.to_string(),
            active: true,
        };
        let record = TxRecord {
            tx_hash: tx_hash.clone(),
            chain_id: contracts.chain_id(),
            actor: format!("{actor:#x}"),
            action: "create-listing".to_string(),
            amount: "0".to_string(),
        };

        Ok(finalize(
            contracts.chain_id(),
            "create-listing",
            tx_hash,
            async {
                self.backend.create_listing(&listing).await?;
                self.backend.record_transaction(&record).await
            },
        )
        .await)
    }

    /// Estates recorded for the connected owner.
    ///
    /// Served from the backend mirror; the verification and tokenization
    /// flags on the rows are display state, not chain truth.
    pub async fn my_estates(&self) -> Result<Vec<EstateRecord>, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let owner = format!("{actor:#x}");

        let estates = self.backend.estates().await?;
        Ok(estates
            .into_iter()
            .filter(|estate| estate.owner.eq_ignore_ascii_case(&owner))
            .collect())
    }
}
