use serde::{Deserialize, Serialize};

/// Header carrying the caller's password
pub const AUTH_HEADER: &str = "x-auth-password";

/// Request information for authorization
#[derive(Debug, Clone, Default)]
pub struct AuthRequest {
    /// Password presented by the caller, if any
    pub credential: Option<String>,
}

impl AuthRequest {
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Some(credential.into()),
        }
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub valid: bool,
    pub adult_allowed: bool,
}

impl Grant {
    /// Everything allowed, adult content included.
    pub fn full() -> Self {
        Self {
            valid: true,
            adult_allowed: true,
        }
    }

    pub fn denied() -> Self {
        Self {
            valid: false,
            adult_allowed: false,
        }
    }
}
