//! Credential backend selection.
//!
//! The `[credentials]` table of `conciliador.toml` picks a backend:
//!
//! ```toml
//! [credentials]
//! backend = "pass"
//! path = "portales/proveedor"
//! ```
//!
//! or
//!
//! ```toml
//! [credentials]
//! backend = "env"
//! ```

use serde::{Deserialize, Serialize};

use super::pass::{PassConfig, PassCredentialSource};
use super::{CredentialSource, EnvCredentialSource};

/// Configuration for a credential source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum CredentialConfig {
    /// Password-store (pass) backend.
    Pass {
        #[serde(flatten)]
        config: PassConfig,
    },
    /// Environment variables (CONCILIADOR_USERNAME / CONCILIADOR_PASSWORD by
    /// default).
    Env {
        #[serde(default)]
        username_var: Option<String>,
        #[serde(default)]
        password_var: Option<String>,
    },
}

impl CredentialConfig {
    /// Build a credential source from this configuration.
    pub fn build(&self) -> Box<dyn CredentialSource> {
        match self {
            CredentialConfig::Pass { config } => {
                Box::new(PassCredentialSource::new(config.clone()))
            }
            CredentialConfig::Env {
                username_var,
                password_var,
            } => match (username_var, password_var) {
                (Some(user), Some(pass)) => Box::new(EnvCredentialSource::new(user, pass)),
                _ => Box::new(EnvCredentialSource::default()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pass_backend() {
        let config: CredentialConfig = toml::from_str(
            r#"
backend = "pass"
path = "portales/proveedor"
username_field = "login"
"#,
        )
        .unwrap();

        match config {
            CredentialConfig::Pass { config } => {
                assert_eq!(config.path, "portales/proveedor");
                assert_eq!(config.username_field, "login");
            }
            other => panic!("expected pass backend, got {other:?}"),
        }
    }

    #[test]
    fn parses_env_backend_without_overrides() {
        let config: CredentialConfig = toml::from_str("backend = \"env\"").unwrap();
        match config {
            CredentialConfig::Env {
                username_var,
                password_var,
            } => {
                assert!(username_var.is_none());
                assert!(password_var.is_none());
            }
            other => panic!("expected env backend, got {other:?}"),
        }
    }
}
