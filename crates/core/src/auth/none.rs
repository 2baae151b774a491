use super::{AuthRequest, Authenticator, Grant};

/// Authenticator used when auth is disabled: every caller gets full access,
/// adult sources included.
pub struct NoneAuthenticator;

impl NoneAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoneAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

impl Authenticator for NoneAuthenticator {
    fn authorize(&self, _request: &AuthRequest) -> Grant {
        Grant::full()
    }

    fn method_name(&self) -> &'static str {
        "none"
    }
}
