use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::credentials::CredentialConfig;
use crate::duration::deserialize_duration;

/// Portal and timing configuration for the reconciliation session.
///
/// Durations are written as human-readable strings in TOML ("60s", "100ms").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Root URL of the provider portal. Must be configured; there is no
    /// sensible default.
    pub base_url: String,

    /// Path of the pending-services view, relative to `base_url`. Also used
    /// to recognize when the page is already there.
    pub pending_path: String,

    /// Timeout for full page navigations.
    #[serde(deserialize_with = "deserialize_duration")]
    pub navigation_timeout: Duration,

    /// Timeout for individual element actions and selector waits.
    #[serde(deserialize_with = "deserialize_duration")]
    pub action_timeout: Duration,

    /// Short bounded wait for the results grid (or its empty marker) after a
    /// search submit. Expiry means "no data", not failure.
    #[serde(deserialize_with = "deserialize_duration")]
    pub results_timeout: Duration,

    /// Pause after login and after opening the acceptance modal, so the
    /// portal's redirects and animations settle.
    #[serde(deserialize_with = "deserialize_duration")]
    pub settle_delay: Duration,

    /// Delay between typed characters.
    #[serde(deserialize_with = "deserialize_duration")]
    pub type_delay: Duration,

    /// Fixed wait between search attempts. No jitter, no growth.
    #[serde(deserialize_with = "deserialize_duration")]
    pub retry_delay: Duration,

    /// Attempts per record before degrading to an error-in-query outcome.
    pub max_attempts: u32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            pending_path: "/servicios/pendientes".to_string(),
            navigation_timeout: Duration::from_secs(60),
            action_timeout: Duration::from_secs(30),
            results_timeout: Duration::from_secs(5),
            settle_delay: Duration::from_secs(2),
            type_delay: Duration::from_millis(100),
            retry_delay: Duration::from_secs(2),
            max_attempts: 3,
        }
    }
}

impl PortalConfig {
    /// Absolute URL of the pending-services view.
    pub fn pending_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.pending_path)
    }
}

/// Application configuration, loaded from `conciliador.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portal: PortalConfig,

    /// Which credential backend supplies the portal login.
    pub credentials: Option<CredentialConfig>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
