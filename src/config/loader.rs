use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use super::{Config, ConfigError, ConfigRaw};

/// Loads configuration from the default `config.toml` in the working
/// directory, if present, layered over the built-in defaults.
pub fn load() -> Result<Config, ConfigError> {
    load_from(Path::new("config.toml"))
}

/// Loads configuration from an explicit TOML file.
///
/// Layering, lowest priority first: built-in defaults, the TOML file (skipped
/// when absent), then `RET_`-prefixed environment variables with `__` as the
/// section separator (e.g. `RET_BACKEND__BASE_URL`).
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ConfigRaw::default()));

    if path.exists() {
        tracing::info!(path = %path.display(), "Loading configuration overrides");
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("RET_").split("__"));

    let raw: ConfigRaw = figment.extract().map_err(Box::new)?;
    raw.resolve()
}
