use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Search timeout is not 0
/// - Every source has a code and url, and codes are unique
/// - Enabled auth has at least one non-empty password
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.search.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "search.timeout_secs cannot be 0".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for source in &config.sources {
        if source.code.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "source '{}' has an empty code",
                source.name
            )));
        }
        if source.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "source '{}' has an empty url",
                source.code
            )));
        }
        if !seen.insert(source.code.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate source code: {}",
                source.code
            )));
        }
    }

    if config.auth.enabled {
        if config.auth.passwords.is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.enabled requires at least one password".to_string(),
            ));
        }
        if config.auth.passwords.iter().any(|p| p.password.is_empty()) {
            return Err(ConfigError::ValidationError(
                "auth.passwords cannot contain an empty password".to_string(),
            ));
        }
    }

    Ok(())
}
