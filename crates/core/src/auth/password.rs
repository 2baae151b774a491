//! Password whitelist authorization.

use crate::config::PasswordEntry;

use super::{AuthRequest, Authenticator, Grant};

/// Authenticator that checks the presented password against a whitelist.
///
/// Each whitelisted password carries its own adult-content permission.
pub struct PasswordAuthenticator {
    entries: Vec<PasswordEntry>,
}

impl PasswordAuthenticator {
    pub fn new(entries: Vec<PasswordEntry>) -> Self {
        Self { entries }
    }
}

impl Authenticator for PasswordAuthenticator {
    fn authorize(&self, request: &AuthRequest) -> Grant {
        let Some(presented) = request.credential.as_deref() else {
            return Grant::denied();
        };

        // Check every entry so timing doesn't reveal the match position
        let mut grant = Grant::denied();
        for entry in &self.entries {
            if constant_time_eq(presented.as_bytes(), entry.password.as_bytes()) && !grant.valid {
                grant = Grant {
                    valid: true,
                    adult_allowed: entry.adult,
                };
            }
        }
        grant
    }

    fn method_name(&self) -> &'static str {
        "password"
    }
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
