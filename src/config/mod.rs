mod error;
mod loader;
mod raw;

pub use error::ConfigError;
pub use loader::{load, load_from};
pub use raw::{
    AppPaths, BackendConfig, BackendConfigRaw, ChainConfig, ChainConfigRaw, Config, ConfigRaw,
};
