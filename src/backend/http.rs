use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use super::{
    BackendApi, Credentials,
    error::{BackendError, Result},
};
use crate::{
    config::BackendConfig,
    observability,
    session_store::SessionStore,
    types::{EstateRecord, OperatorProfile, OwnerProfile, Position, TokenListing, TxRecord},
};

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// REST backend client.
///
/// One pooled client lives for the process lifetime. The bearer token is read
/// from the session store on every call, so a login or logout takes effect on
/// the next request without rebuilding the client.
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
    store: Arc<SessionStore>,
}

impl HttpBackend {
    pub fn new(config: BackendConfig, store: Arc<SessionStore>) -> Result<Self> {
        let client = Client::builder()
            // Connection pooling: keep up to 10 idle connections per host
            .pool_max_idle_per_host(10)
            // Close idle connections after 30 seconds
            .pool_idle_timeout(Duration::from_secs(30))
            // TCP keepalive to detect dead connections
            .tcp_keepalive(Duration::from_secs(60))
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            config,
            store,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// Attach the persisted bearer token, if any.
    async fn auth_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.store.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and record its outcome.
    ///
    /// Transport failures and 401 are terminal here; every other status flows
    /// back to the caller, which decides whether a 404 is a miss or an error.
    async fn execute(&self, endpoint: &'static str, builder: RequestBuilder) -> Result<Response> {
        let started = Instant::now();
        match self.auth_headers(builder).await.send().await {
            Ok(response) if response.status() == StatusCode::UNAUTHORIZED => {
                observability::record_backend_call(endpoint, "unauthorized", started.elapsed());
                Err(BackendError::Unauthorized)
            }
            Ok(response) => {
                let status = if response.status().is_success() {
                    "success"
                } else {
                    "error"
                };
                observability::record_backend_call(endpoint, status, started.elapsed());
                Ok(response)
            }
            Err(error) => {
                observability::record_backend_call(endpoint, "transport", started.elapsed());
                Err(error.into())
            }
        }
    }

    /// Map a non-success response to an error carrying the body text.
    async fn check(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(BackendError::Api { status, message })
    }

    /// Send, require success, and return the response.
    async fn send(&self, endpoint: &'static str, builder: RequestBuilder) -> Result<Response> {
        let response = self.execute(endpoint, builder).await?;
        Self::check(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        response.json().await.map_err(|error| BackendError::Parse {
            reason: error.to_string(),
        })
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn admin_login(&self, credentials: &Credentials) -> Result<String> {
        let builder = self
            .client
            .post(self.url("/api/auth/admin/login"))
            .json(credentials);
        let response = self.send("admin-login", builder).await?;
        let login: LoginResponse = Self::decode(response).await?;
        Ok(login.token)
    }

    async fn operator_login(&self, credentials: &Credentials) -> Result<String> {
        let builder = self
            .client
            .post(self.url("/api/auth/operator/login"))
            .json(credentials);
        let response = self.send("operator-login", builder).await?;
        let login: LoginResponse = Self::decode(response).await?;
        Ok(login.token)
    }

    async fn register_estate_owner(&self, profile: &OwnerProfile) -> Result<()> {
        let builder = self.client.post(self.url("/api/owners")).json(profile);
        self.send("owner-register", builder).await?;
        Ok(())
    }

    async fn estate_owner(&self, address: &str) -> Result<Option<OwnerProfile>> {
        let builder = self.client.get(self.url(&format!("/api/owners/{address}")));
        let response = self.execute("owner-lookup", builder).await?;

        // 404 means no profile is registered for this address
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response).await?;
        let profile = Self::decode(response).await?;
        Ok(Some(profile))
    }

    async fn operators(&self) -> Result<Vec<OperatorProfile>> {
        let builder = self.client.get(self.url("/api/operators"));
        let response = self.send("operators", builder).await?;
        Self::decode(response).await
    }

    async fn update_operator_status(&self, address: &str, approved: bool) -> Result<()> {
        let builder = self
            .client
            .patch(self.url(&format!("/api/operators/{address}/status")))
            .json(&json!({ "approved": approved }));
        self.send("operator-status", builder).await?;
        Ok(())
    }

    async fn estates(&self) -> Result<Vec<EstateRecord>> {
        let builder = self.client.get(self.url("/api/estates"));
        let response = self.send("estates", builder).await?;
        Self::decode(response).await
    }

    async fn create_estate(&self, estate: &EstateRecord) -> Result<()> {
        let builder = self.client.post(self.url("/api/estates")).json(estate);
        self.send("estate-create", builder).await?;
        Ok(())
    }

    async fn update_estate_status(&self, estate_id: u64, verified: bool) -> Result<()> {
        let builder = self
            .client
            .patch(self.url(&format!("/api/estates/{estate_id}/status")))
            .json(&json!({ "verified": verified }));
        self.send("estate-status", builder).await?;
        Ok(())
    }

    async fn listings(&self) -> Result<Vec<TokenListing>> {
        let builder = self.client.get(self.url("/api/listings"));
        let response = self.send("listings", builder).await?;
        Self::decode(response).await
    }

    async fn create_listing(&self, listing: &TokenListing) -> Result<()> {
        let builder = self.client.post(self.url("/api/listings")).json(listing);
        self.send("listing-create", builder).await?;
        Ok(())
    }

    async fn position(&self, investor: &str, estate_id: u64) -> Result<Option<Position>> {
        let builder = self
            .client
            .get(self.url(&format!("/api/positions/{investor}/{estate_id}")));
        let response = self.execute("position-lookup", builder).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response).await?;
        let position = Self::decode(response).await?;
        Ok(Some(position))
    }

    async fn upsert_position(&self, position: &Position) -> Result<()> {
        let builder = self.client.put(self.url("/api/positions")).json(position);
        self.send("position-upsert", builder).await?;
        Ok(())
    }

    async fn record_transaction(&self, record: &TxRecord) -> Result<()> {
        let builder = self.client.post(self.url("/api/transactions")).json(record);
        self.send("tx-record", builder).await?;
        Ok(())
    }
}
