//! Credential checks for the single configured API account.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::config::SecurityConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|candidate| candidate.eq_ignore_ascii_case(role))
    }
}

/// In-memory user store holding only the password digest.
#[derive(Clone)]
pub struct CredentialStore {
    username: String,
    password_digest: [u8; 32],
    roles: Vec<String>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("username", &self.username)
            .field("password_digest", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

impl CredentialStore {
    pub fn new(username: impl Into<String>, password: &SecretString, roles: Vec<String>) -> Self {
        Self {
            username: username.into(),
            password_digest: digest(password.expose_secret()),
            roles,
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(config.username.clone(), &config.password, config.roles.clone())
    }

    /// Returns the principal when both username and password match.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<Principal> {
        let user_ok: bool = digest(username).ct_eq(&digest(&self.username)).into();
        let password_ok: bool = digest(password).ct_eq(&self.password_digest).into();

        (user_ok && password_ok)
            .then(|| Principal { username: self.username.clone(), roles: self.roles.clone() })
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}
