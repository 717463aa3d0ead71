use std::sync::Arc;

use alloy::primitives::{Address, U256};

use super::{OperationSummary, ServiceError, connected_address, finalize};
use crate::{
    backend::BackendApi,
    chain::{ChainError, ChainManager, ContractSet, utils::parse_token_amount},
    types::{ChainId, Position, TokenListing, TxRecord},
    wallet::WalletSession,
};

/// Read-only comparison of an on-chain token balance against the backend
/// mirror. Reconciliation is manual; nothing here mutates either side.
#[derive(Debug, Clone)]
pub struct PositionDrift {
    pub estate_id: u64,
    pub on_chain: String,
    pub recorded: String,
    pub drifted: bool,
}

/// Investor dashboard operations.
pub struct InvestorService {
    session: Arc<WalletSession>,
    chain: Arc<ChainManager>,
    backend: Arc<dyn BackendApi>,
}

impl InvestorService {
    pub(crate) fn new(
        session: Arc<WalletSession>,
        chain: Arc<ChainManager>,
        backend: Arc<dyn BackendApi>,
    ) -> Self {
        Self {
            session,
            chain,
            backend,
        }
    }

    /// Listings from the backend, refreshed with live on-chain state.
    ///
    /// Chain reads are best-effort; a failed read keeps the mirrored row so
    /// the marketplace still renders.
    pub async fn load_listings(&self) -> Result<Vec<TokenListing>, ServiceError> {
        let mut listings = self.backend.listings().await?;

        let contracts = match self.chain.resolve_contracts().await {
            Ok(contracts) => contracts,
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "Serving listings from the backend mirror only"
                );
                return Ok(listings);
            }
        };

        for listing in &mut listings {
            match contracts
                .tokenization_manager()
                .getListing(U256::from(listing.estate_id))
                .call()
                .await
            {
                Ok(live) => {
                    listing.supply = live.supply.to_string();
                    listing.remaining = live.remaining.to_string();
                    listing.price_per_token = live.pricePerToken.to_string();
                    listing.active = live.active;
                }
                Err(error) => {
                    tracing::warn!(
                        estate_id = listing.estate_id,
                        error = %error,
                        "On-chain listing read failed; keeping the mirrored row"
                    );
                }
            }
        }

        Ok(listings)
    }

    /// Buy estate tokens: payment-token approval for the full cost, then
    /// the purchase itself.
    ///
    /// Both transactions are awaited to confirmation, and the contract set
    /// is re-checked against the wallet's live chain between them. The
    /// position mirror and transaction log are written only afterwards.
    pub async fn buy_tokens(
        &self,
        estate_id: u64,
        quantity: &str,
    ) -> Result<OperationSummary, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let contracts = self.chain.resolve_contracts().await?;

        // Tokens are whole units; reject malformed input before any call.
        let qty = parse_token_amount(quantity, 0)?;

        let listing = contracts
            .tokenization_manager()
            .getListing(U256::from(estate_id))
            .call()
            .await
            .map_err(ChainError::from)?;
        if !listing.active {
            return Err(ServiceError::ListingInactive { estate_id });
        }

        let cost = listing
            .pricePerToken
            .checked_mul(qty)
            .ok_or_else(|| ChainError::InvalidAmount {
                amount: quantity.to_string(),
                reason: "total cost overflows".to_string(),
            })?;

        self.chain
            .handle_contract_call(
                contracts.chain_id(),
                "payment-approve",
                contracts
                    .payment_token()
                    .approve(*contracts.tokenization_manager().address(), cost)
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
                "buy-tokens",
                contracts
                    .tokenization_manager()
                    .buyTokens(U256::from(estate_id), qty)
                    .send()
                    .await,
            )
            .await?;

        let tx_hash = format!("{:#x}", receipt.transaction_hash);
        let record = TxRecord {
            tx_hash: tx_hash.clone(),
            chain_id: contracts.chain_id(),
            actor: format!("{actor:#x}"),
            action: "buy-tokens".to_string(),
            amount: cost.to_string(),
        };

        self.settle_position(actor, contracts.chain_id(), estate_id, tx_hash, record, &contracts)
            .await
    }

    /// Sell estate tokens back through the tokenization manager.
    pub async fn sell_tokens(
        &self,
        estate_id: u64,
        quantity: &str,
    ) -> Result<OperationSummary, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let contracts = self.chain.resolve_contracts().await?;

        let qty = parse_token_amount(quantity, 0)?;

        // Price read up front so the log records the proceeds.
        let listing = contracts
            .tokenization_manager()
            .getListing(U256::from(estate_id))
            .call()
            .await
            .map_err(ChainError::from)?;
        let proceeds = listing
            .pricePerToken
            .checked_mul(qty)
            .ok_or_else(|| ChainError::InvalidAmount {
                amount: quantity.to_string(),
                reason: "total proceeds overflow".to_string(),
            })?;

        let receipt = self
            .chain
            .handle_contract_call(
                contracts.chain_id(),
                "sell-tokens",
                contracts
                    .tokenization_manager()
                    .sellTokens(U256::from(estate_id), qty)
                    .send()
                    .await,
            )
            .await?;

        let tx_hash = format!("{:#x}", receipt.transaction_hash);
        let record = TxRecord {
            tx_hash: tx_hash.clone(),
            chain_id: contracts.chain_id(),
            actor: format!("{actor:#x}"),
            action: "sell-tokens".to_string(),
            amount: proceeds.to_string(),
        };

        self.settle_position(actor, contracts.chain_id(), estate_id, tx_hash, record, &contracts)
            .await
    }

    /// The connected investor's live position in one estate.
    pub async fn position(&self, estate_id: u64) -> Result<Position, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let contracts = self.chain.resolve_contracts().await?;

        let balance = contracts
            .tokenization_manager()
            .balanceOf(actor, U256::from(estate_id))
            .call()
            .await
            .map_err(ChainError::from)?;

        Ok(Position {
            investor: format!("{actor:#x}"),
            estate_id,
            balance: balance.to_string(),
            chain_id: contracts.chain_id(),
        })
    }

    /// Compare the on-chain balance against the backend mirror.
    pub async fn position_drift(&self, estate_id: u64) -> Result<PositionDrift, ServiceError> {
        let actor = connected_address(&self.session).await?;
        let contracts = self.chain.resolve_contracts().await?;

        let balance = contracts
            .tokenization_manager()
            .balanceOf(actor, U256::from(estate_id))
            .call()
            .await
            .map_err(ChainError::from)?;
        let recorded = self
            .backend
            .position(&format!("{actor:#x}"), estate_id)
            .await?;

        Ok(drift_between(estate_id, balance, recorded.as_ref()))
    }

    /// Refresh the position mirror and append the log entry after a
    /// confirmed trade.
    ///
    /// `actor` is the submitting address, pinned before the transaction was
    /// sent; the live session is not consulted again once the trade has
    /// confirmed. A failed balance read means the mirror cannot be written
    /// accurately; the log entry still lands and the summary reports drift.
    async fn settle_position(
        &self,
        actor: Address,
        chain_id: ChainId,
        estate_id: u64,
        tx_hash: String,
        record: TxRecord,
        contracts: &ContractSet,
    ) -> Result<OperationSummary, ServiceError> {
        let action = record.action.clone();

        match contracts
            .tokenization_manager()
            .balanceOf(actor, U256::from(estate_id))
            .call()
            .await
        {
            Ok(balance) => {
                let position = Position {
                    investor: format!("{actor:#x}"),
                    estate_id,
                    balance: balance.to_string(),
                    chain_id,
                };
                Ok(finalize(chain_id, &action, tx_hash, async {
                    self.backend.upsert_position(&position).await?;
                    self.backend.record_transaction(&record).await
                })
                .await)
            }
            Err(error) => {
                tracing::warn!(
                    estate_id,
                    error = %error,
                    "Balance read failed after the trade; position mirror not updated"
                );
                let mut summary = finalize(chain_id, &action, tx_hash, async {
                    self.backend.record_transaction(&record).await
                })
                .await;
                summary.drift = true;
                Ok(summary)
            }
        }
    }
}

/// Pure comparison between an on-chain balance and the mirrored record.
fn drift_between(estate_id: u64, on_chain: U256, recorded: Option<&Position>) -> PositionDrift {
    let recorded_balance = recorded
        .map(|position| position.balance.clone())
        .unwrap_or_else(|| "0".to_string());
    let matches = recorded_balance
        .parse::<U256>()
        .map(|value| value == on_chain)
        .unwrap_or(false);

    PositionDrift {
        estate_id,
        on_chain: on_chain.to_string(),
        recorded: recorded_balance,
        drifted: !matches,
    }
}
