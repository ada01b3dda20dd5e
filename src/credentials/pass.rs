//! Password-store (pass) credential backend.
//!
//! The entry's first line is the password; the username comes from a
//! `field-name: value` line (by default `username:`).

use std::process::Command;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CredentialSource, Credentials};

fn default_username_field() -> String {
    "username".to_string()
}

/// Configuration for a pass credential source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassConfig {
    /// The pass entry path (e.g., "portales/proveedor").
    pub path: String,

    /// Which field line carries the username.
    #[serde(default = "default_username_field")]
    pub username_field: String,
}

/// Credential source backed by password-store (pass).
pub struct PassCredentialSource {
    config: PassConfig,
}

impl PassCredentialSource {
    pub fn new(config: PassConfig) -> Self {
        Self { config }
    }

    /// Source for a simple entry path, with the default `username:` field.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self::new(PassConfig {
            path: path.into(),
            username_field: default_username_field(),
        })
    }

    fn read_entry(&self) -> Result<String> {
        let output = Command::new("pass")
            .arg("show")
            .arg(&self.config.path)
            .output()
            .context("Failed to run pass command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("pass command failed: {}", stderr.trim());
        }

        String::from_utf8(output.stdout).context("Invalid UTF-8 in pass output")
    }
}

#[async_trait]
impl CredentialSource for PassCredentialSource {
    async fn credentials(&self) -> Result<Option<Credentials>> {
        let content = self.read_entry()?;
        Ok(parse_credentials(&content, &self.config.username_field))
    }
}

/// Parse a pass entry into a login pair. The first line is the password;
/// remaining lines are `name: value` fields.
fn parse_credentials(content: &str, username_field: &str) -> Option<Credentials> {
    let mut lines = content.lines();
    let password = lines.next()?.trim().to_string();
    if password.is_empty() {
        return None;
    }

    let username = lines.find_map(|line| {
        let (key, value) = line.split_once(": ")?;
        (key.trim() == username_field).then(|| value.trim().to_string())
    })?;

    if username.is_empty() {
        return None;
    }

    Some(Credentials::new(username, password))
}
