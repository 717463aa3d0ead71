//! Scriptable backend used by tests.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    BackendApi, Credentials,
    error::{BackendError, Result},
};
use crate::types::{EstateRecord, OperatorProfile, OwnerProfile, Position, TokenListing, TxRecord};

/// An in-memory backend whose rows and failures are driven by the test.
///
/// Every call is recorded by endpoint label in invocation order, so tests can
/// assert both that bookkeeping happened in sequence and that a failed flow
/// touched the backend zero times.
pub(crate) struct FakeBackend {
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    token: String,
    owners: Vec<OwnerProfile>,
    operators: Vec<OperatorProfile>,
    estates: Vec<EstateRecord>,
    listings: Vec<TokenListing>,
    positions: Vec<Position>,
    transactions: Vec<TxRecord>,
    calls: Vec<String>,
    fail_writes: bool,
}

impl FakeBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState {
                token: "fake-token".to_string(),
                ..FakeState::default()
            }),
        })
    }

    /// Make every mutating endpoint fail with a scripted server error.
    pub(crate) async fn fail_writes(&self) {
        self.state.lock().await.fail_writes = true;
    }

    pub(crate) async fn push_operator(&self, operator: OperatorProfile) {
        self.state.lock().await.operators.push(operator);
    }

    pub(crate) async fn push_estate(&self, estate: EstateRecord) {
        self.state.lock().await.estates.push(estate);
    }

    pub(crate) async fn push_listing(&self, listing: TokenListing) {
        self.state.lock().await.listings.push(listing);
    }

    pub(crate) async fn push_owner(&self, owner: OwnerProfile) {
        self.state.lock().await.owners.push(owner);
    }

    /// Endpoint labels in invocation order.
    pub(crate) async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    pub(crate) async fn recorded_transactions(&self) -> Vec<TxRecord> {
        self.state.lock().await.transactions.clone()
    }

    pub(crate) async fn stored_operators(&self) -> Vec<OperatorProfile> {
        self.state.lock().await.operators.clone()
    }

    async fn record(&self, endpoint: &str) {
        self.state.lock().await.calls.push(endpoint.to_string());
    }

    async fn write_gate(&self, endpoint: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.calls.push(endpoint.to_string());
        if state.fail_writes {
            return Err(BackendError::Api {
                status: 500,
                message: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn admin_login(&self, _credentials: &Credentials) -> Result<String> {
        self.record("admin-login").await;
        Ok(self.state.lock().await.token.clone())
    }

    async fn operator_login(&self, _credentials: &Credentials) -> Result<String> {
        self.record("operator-login").await;
        Ok(self.state.lock().await.token.clone())
    }

    async fn register_estate_owner(&self, profile: &OwnerProfile) -> Result<()> {
        self.write_gate("owner-register").await?;
        self.state.lock().await.owners.push(profile.clone());
        Ok(())
    }

    async fn estate_owner(&self, address: &str) -> Result<Option<OwnerProfile>> {
        self.record("owner-lookup").await;
        let state = self.state.lock().await;
        Ok(state
            .owners
            .iter()
            .find(|owner| owner.address.eq_ignore_ascii_case(address))
            .cloned())
    }

    async fn operators(&self) -> Result<Vec<OperatorProfile>> {
        self.record("operators").await;
        Ok(self.state.lock().await.operators.clone())
    }

    async fn update_operator_status(&self, address: &str, approved: bool) -> Result<()> {
        self.write_gate("operator-status").await?;
        let mut state = self.state.lock().await;
        for operator in &mut state.operators {
            if operator.address.eq_ignore_ascii_case(address) {
                operator.approved = approved;
            }
        }
        Ok(())
    }

    async fn estates(&self) -> Result<Vec<EstateRecord>> {
        self.record("estates").await;
        Ok(self.state.lock().await.estates.clone())
    }

    async fn create_estate(&self, estate: &EstateRecord) -> Result<()> {
        self.write_gate("estate-create").await?;
        self.state.lock().await.estates.push(estate.clone());
        Ok(())
    }

    async fn update_estate_status(&self, estate_id: u64, verified: bool) -> Result<()> {
        self.write_gate("estate-status").await?;
        let mut state = self.state.lock().await;
        for estate in &mut state.estates {
            if estate.estate_id == estate_id {
                estate.verified = verified;
            }
        }
        Ok(())
    }

    async fn listings(&self) -> Result<Vec<TokenListing>> {
        self.record("listings").await;
        Ok(self.state.lock().await.listings.clone())
    }

    async fn create_listing(&self, listing: &TokenListing) -> Result<()> {
        self.write_gate("listing-create").await?;
        self.state.lock().await.listings.push(listing.clone());
        Ok(())
    }

    async fn position(&self, investor: &str, estate_id: u64) -> Result<Option<Position>> {
        self.record("position-lookup").await;
        let state = self.state.lock().await;
        Ok(state
            .positions
            .iter()
            .find(|position| {
                position.investor.eq_ignore_ascii_case(investor)
                    && position.estate_id == estate_id
            })
            .cloned())
    }

    async fn upsert_position(&self, position: &Position) -> Result<()> {
        self.write_gate("position-upsert").await?;
        let mut state = self.state.lock().await;
        state.positions.retain(|existing| {
            !(existing.investor.eq_ignore_ascii_case(&position.investor)
                && existing.estate_id == position.estate_id)
        });
        state.positions.push(position.clone());
        Ok(())
    }

    async fn record_transaction(&self, record: &TxRecord) -> Result<()> {
        self.write_gate("tx-record").await?;
        self.state.lock().await.transactions.push(record.clone());
        Ok(())
    }
}
