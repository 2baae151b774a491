use base64::{engine::general_purpose::STANDARD, Engine as _};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// Env var holding the config file path
pub const CONFIG_PATH_ENV: &str = "REELHUB_CONFIG";

/// Env var holding a base64 encoded TOML config, used instead of the file when set
pub const CONFIG_INLINE_ENV: &str = "REELHUB_CONFIG_INLINE";

const ENV_PREFIX: &str = "REELHUB_";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Load configuration from file with environment variable overrides.
///
/// A sibling `<name>.local.toml` is merged over the main file when present.
/// Nested keys are overridden with a double underscore, e.g.
/// `REELHUB_SEARCH__TIMEOUT_SECS=5`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let mut figment = Figment::new().merge(Toml::file(path));

    let local = local_override_path(path);
    if local.exists() {
        figment = figment.merge(Toml::file(&local));
    }

    extract(figment)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from a base64 encoded TOML document, with env overrides.
pub fn load_config_from_base64(encoded: &str) -> Result<Config, ConfigError> {
    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ConfigError::ParseError(format!("invalid base64 config: {}", e)))?;
    let text = String::from_utf8(decoded)
        .map_err(|e| ConfigError::ParseError(format!("inline config is not UTF-8: {}", e)))?;

    extract(Figment::new().merge(Toml::string(&text)))
}

/// Load configuration the way the binary does: inline env config first,
/// then the file named by `REELHUB_CONFIG`, then `config.toml`.
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    if let Ok(encoded) = std::env::var(CONFIG_INLINE_ENV) {
        if !encoded.trim().is_empty() {
            return load_config_from_base64(&encoded);
        }
    }

    load_config(&config_path_from_env())
}

/// Config file path from `REELHUB_CONFIG`, defaulting to `config.toml`
pub fn config_path_from_env() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn local_override_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string());
    path.with_file_name(format!("{}.local.toml", stem))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}
