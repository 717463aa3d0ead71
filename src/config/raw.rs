use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    config::ConfigError,
    logger::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig},
};

/// Centralized application paths derived from the root data directory.
///
/// This provides a single source of truth for all filesystem paths used by the
/// client, making it easy to see the complete directory structure and avoiding
/// path collisions.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Path to the persisted session file (role + auth token)
    pub session_file: PathBuf,
}

impl AppPaths {
    /// Create AppPaths from a root data directory.
    ///
    /// Directory structure:
    /// ```text
    /// {root}/
    /// └── session/
    ///     └── session.json  <- persisted role and auth token
    /// ```
    pub fn from_root(root: &Path) -> Self {
        Self {
            session_file: root.join("session/session.json"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigRaw {
    pub app_data_path: PathBuf,
    pub backend: BackendConfigRaw,
    pub chain: ChainConfigRaw,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app_data_path: PathBuf,
    pub paths: AppPaths,
    pub backend: BackendConfig,
    pub chain: ChainConfig,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
}

impl ConfigRaw {
    pub fn resolve(self) -> Result<Config, ConfigError> {
        let paths = AppPaths::from_root(&self.app_data_path);
        Ok(Config {
            app_data_path: self.app_data_path,
            paths,
            backend: self.backend.resolve()?,
            chain: self.chain.resolve()?,
            logger: self.logger,
            telemetry: self.telemetry,
        })
    }
}

impl Default for ConfigRaw {
    fn default() -> Self {
        Self {
            app_data_path: PathBuf::from("data"),
            backend: BackendConfigRaw::default(),
            chain: ChainConfigRaw::default(),
            logger: LoggerConfig {
                level: "ret_client=info".to_string(),
                format: LogFormat::Pretty,
            },
            telemetry: TelemetryConfig {
                metrics: TelemetryMetricsConfig {
                    enabled: false,
                    bind_address: "127.0.0.1:9464".to_string(),
                },
            },
        }
    }
}

/// Configuration for the bookkeeping backend HTTP client.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct BackendConfigRaw {
    /// Base URL of the backend REST service.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for BackendConfigRaw {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_ms: 30_000,
            connect_timeout_ms: 10_000,
        }
    }
}

impl BackendConfigRaw {
    /// Ensures the base URL is an absolute http(s) URL without a trailing slash.
    fn ensure_base_url(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidConfig(format!(
                "backend base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }

    fn ensure_timeouts(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == 0 || self.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "backend timeouts must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolve(self) -> Result<BackendConfig, ConfigError> {
        self.ensure_base_url()?;
        self.ensure_timeouts()?;

        Ok(BackendConfig {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            request_timeout_ms: self.request_timeout_ms,
            connect_timeout_ms: self.connect_timeout_ms,
        })
    }
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    base_url: String,
    request_timeout_ms: u64,
    connect_timeout_ms: u64,
}

impl BackendConfig {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Configuration for on-chain transaction handling.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ChainConfigRaw {
    /// Number of confirmations to wait for when fetching transaction receipts.
    pub tx_confirmations: u64,
    /// Timeout for waiting on transaction receipts in milliseconds.
    /// Set to 0 to disable the timeout.
    pub tx_receipt_timeout_ms: u64,
}

impl Default for ChainConfigRaw {
    fn default() -> Self {
        Self {
            tx_confirmations: 1,
            tx_receipt_timeout_ms: 300_000,
        }
    }
}

impl ChainConfigRaw {
    fn ensure_confirmations(&self) -> Result<(), ConfigError> {
        if self.tx_confirmations == 0 {
            return Err(ConfigError::InvalidConfig(
                "tx_confirmations must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolve(self) -> Result<ChainConfig, ConfigError> {
        self.ensure_confirmations()?;

        Ok(ChainConfig {
            tx_confirmations: self.tx_confirmations,
            tx_receipt_timeout_ms: self.tx_receipt_timeout_ms,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ChainConfig {
    tx_confirmations: u64,
    tx_receipt_timeout_ms: u64,
}

impl ChainConfig {
    pub fn tx_confirmations(&self) -> u64 {
        self.tx_confirmations
    }

    pub fn tx_receipt_timeout(&self) -> Option<Duration> {
        if self.tx_receipt_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.tx_receipt_timeout_ms))
        }
    }
}
