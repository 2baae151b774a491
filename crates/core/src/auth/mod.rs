mod none;
mod password;
mod traits;
mod types;

pub use none::*;
pub use password::*;
pub use traits::*;
pub use types::*;

use crate::config::AuthConfig;

/// Factory function to create authenticator from config
pub fn create_authenticator(config: &AuthConfig) -> Result<Box<dyn Authenticator>, AuthError> {
    if !config.enabled {
        return Ok(Box::new(NoneAuthenticator::new()));
    }

    if config.passwords.is_empty() {
        return Err(AuthError::ConfigurationError(
            "at least one password must be set when auth is enabled".to_string(),
        ));
    }

    Ok(Box::new(PasswordAuthenticator::new(config.passwords.clone())))
}
