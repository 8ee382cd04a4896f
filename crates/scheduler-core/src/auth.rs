use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Credential check and token issuance, consulted by the gateway before any
/// task operation.
pub trait Authenticator: Send + Sync {
    fn issue_token(&self, password: &str) -> Result<String, CoreError>;
    fn verify(&self, token: Option<&str>) -> bool;
}

/// Single shared password. The token is a digest of the password, so it
/// stays valid until the password changes.
///
/// Without a configured password the service is open: every request is
/// authorized and sign-in is refused.
#[derive(Debug, Clone, Default)]
pub struct PasswordAuthenticator {
    password: Option<String>,
}

impl PasswordAuthenticator {
    pub fn new(password: Option<String>) -> Self {
        Self {
            password: password.filter(|p| !p.is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.password.is_some()
    }

    fn token_for(password: &str) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(password.as_bytes()))
    }
}

impl Authenticator for PasswordAuthenticator {
    fn issue_token(&self, password: &str) -> Result<String, CoreError> {
        match &self.password {
            Some(expected) if expected == password => Ok(Self::token_for(expected)),
            _ => Err(CoreError::InvalidCredentials),
        }
    }

    fn verify(&self, token: Option<&str>) -> bool {
        match &self.password {
            None => true,
            Some(expected) => token.is_some_and(|t| t == Self::token_for(expected)),
        }
    }
}
