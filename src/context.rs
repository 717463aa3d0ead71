use std::sync::Arc;

use crate::{
    backend::{BackendApi, HttpBackend},
    chain::ChainManager,
    config::Config,
    error::ClientError,
    services::{self, AdminService, InvestorService, OperatorService, OwnerService, Services},
    session_store::SessionStore,
    wallet::{WalletProvider, WalletSession},
};

/// Fully wired client: session, chain manager, backend, and role services.
///
/// Accessors only; behavior lives in the subsystems. A `None` wallet builds
/// a browse-only client where every contract operation reports the missing
/// connection.
pub struct Context {
    session: Arc<WalletSession>,
    chain: Arc<ChainManager>,
    backend: Arc<dyn BackendApi>,
    store: Arc<SessionStore>,
    services: Services,
}

impl Context {
    /// Wire the dependency tree from a resolved configuration and an
    /// optional wallet provider.
    pub async fn initialize(
        config: &Config,
        wallet: Option<Arc<dyn WalletProvider>>,
    ) -> Result<Self, ClientError> {
        let store = Arc::new(SessionStore::load(&config.paths.session_file).await?);
        let session = Arc::new(WalletSession::new(wallet));
        let chain = Arc::new(ChainManager::new(config.chain.clone(), Arc::clone(&session))?);
        let backend: Arc<dyn BackendApi> = Arc::new(HttpBackend::new(
            config.backend.clone(),
            Arc::clone(&store),
        )?);
        let services = services::initialize(&session, &chain, &backend, &store);

        tracing::info!(backend = %config.backend.base_url(), "Client context initialized");

        Ok(Self {
            session,
            chain,
            backend,
            store,
            services,
        })
    }

    pub fn session(&self) -> &Arc<WalletSession> {
        &self.session
    }

    pub fn chain(&self) -> &Arc<ChainManager> {
        &self.chain
    }

    pub fn backend(&self) -> &Arc<dyn BackendApi> {
        &self.backend
    }

    pub fn session_store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    // Role service accessors
    pub fn admin(&self) -> &Arc<AdminService> {
        &self.services.admin
    }

    pub fn operator(&self) -> &Arc<OperatorService> {
        &self.services.operator
    }

    pub fn owner(&self) -> &Arc<OwnerService> {
        &self.services.owner
    }

    pub fn investor(&self) -> &Arc<InvestorService> {
        &self.services.investor
    }

    /// Start forwarding wallet events into the session snapshot and the
    /// persisted session file.
    pub fn spawn_event_pump(&self) -> tokio::task::JoinHandle<()> {
        self.session.spawn_event_pump(Arc::clone(&self.store))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use tempfile::TempDir;

    use super::*;
    use crate::config::ConfigRaw;

    #[tokio::test]
    async fn initialize_wires_a_browse_only_context() {
        let dir = TempDir::new().unwrap();
        let raw = ConfigRaw {
            app_data_path: dir.path().join("data"),
            ..ConfigRaw::default()
        };
        let config = raw.resolve().unwrap();

        let context = Context::initialize(&config, None).await.unwrap();

        assert!(context.session().wallet().is_none());
        assert_eq!(context.session_store().role().await, None);
        assert!(context.chain().registry().is_supported(crate::types::FUJI));
    }
}
