//! Environment-variable credential backend.

use anyhow::Result;
use async_trait::async_trait;

use super::{CredentialSource, Credentials};

const DEFAULT_USERNAME_VAR: &str = "CONCILIADOR_USERNAME";
const DEFAULT_PASSWORD_VAR: &str = "CONCILIADOR_PASSWORD";

/// Reads the login pair from environment variables. Read-only by nature.
pub struct EnvCredentialSource {
    username_var: String,
    password_var: String,
}

impl EnvCredentialSource {
    pub fn new(username_var: impl Into<String>, password_var: impl Into<String>) -> Self {
        Self {
            username_var: username_var.into(),
            password_var: password_var.into(),
        }
    }
}

impl Default for EnvCredentialSource {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME_VAR, DEFAULT_PASSWORD_VAR)
    }
}

#[async_trait]
impl CredentialSource for EnvCredentialSource {
    async fn credentials(&self) -> Result<Option<Credentials>> {
        let username = std::env::var(&self.username_var).ok();
        let password = std::env::var(&self.password_var).ok();

        match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok(Some(Credentials::new(username, password)))
            }
            _ => Ok(None),
        }
    }
}
