use thiserror::Error;

use super::types::{AuthRequest, Grant};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Maps a presented credential to a [`Grant`].
///
/// Implementations are pure functions over immutable configuration.
pub trait Authenticator: Send + Sync {
    /// Decide whether the request is authorized and whether it may see adult sources
    fn authorize(&self, request: &AuthRequest) -> Grant;

    /// Name of this authentication method
    fn method_name(&self) -> &'static str;
}
