//! Credential handling.
//!
//! The core never persists credentials; it reads a username/password pair
//! once per login from a configured backend (password-store or environment
//! variables) and keeps the password wrapped in [`SecretString`] so it stays
//! out of logs.

mod config;
mod env;
mod pass;

pub use config::CredentialConfig;
pub use env::EnvCredentialSource;
pub use pass::{PassConfig, PassCredentialSource};

use anyhow::Result;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

/// A portal login pair.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Both fields present and non-blank.
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.expose_secret().trim().is_empty()
    }
}

/// Supplies the login pair. Returns `Ok(None)` when the backend has no entry,
/// `Err` when the backend itself failed.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn credentials(&self) -> Result<Option<Credentials>>;
}
