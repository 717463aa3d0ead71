use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::{fs, io, sync::RwLock};

use crate::types::Role;

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session file IO failed: {0}")]
    Io(#[from] io::Error),

    #[error("Session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// On-disk shape of the persisted session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedSession {
    role: Option<Role>,
    auth_token: Option<String>,
}

/// Persists the assumed role and backend auth token across restarts.
///
/// Exactly two values live here. They are written through to a single JSON
/// file and always cleared together; a disconnect or logout never leaves one
/// behind.
pub struct SessionStore {
    path: PathBuf,
    state: RwLock<PersistedSession>,
}

impl SessionStore {
    /// Open the store at `path`, loading the persisted session if present.
    ///
    /// A missing file is a fresh session, not an error.
    pub async fn load(path: &Path) -> Result<Self, SessionStoreError> {
        let state = match fs::read(path).await {
            Ok(bytes) => {
                let session: PersistedSession = serde_json::from_slice(&bytes)?;
                tracing::info!(path = %path.display(), "Loaded persisted session");
                session
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No persisted session found");
                PersistedSession::default()
            }
            Err(error) => {
                tracing::error!(
                    path = %path.display(),
                    error = %error,
                    "Failed to read persisted session"
                );
                return Err(error.into());
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            state: RwLock::new(state),
        })
    }

    pub async fn role(&self) -> Option<Role> {
        self.state.read().await.role
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.auth_token.clone()
    }

    pub async fn save_role(&self, role: Role) -> Result<(), SessionStoreError> {
        let mut state = self.state.write().await;
        state.role = Some(role);
        self.persist(&state).await
    }

    pub async fn save_token(&self, token: String) -> Result<(), SessionStoreError> {
        let mut state = self.state.write().await;
        state.auth_token = Some(token);
        self.persist(&state).await
    }

    /// Drop the persisted role and token together.
    pub async fn clear(&self) -> Result<(), SessionStoreError> {
        let mut state = self.state.write().await;
        state.role = None;
        state.auth_token = None;
        self.persist(&state).await
    }

    async fn persist(&self, state: &PersistedSession) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(state)?;
        fs::write(&self.path, bytes).await?;
        Ok(())
    }
}
