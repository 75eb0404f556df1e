//! Checkout configuration loaded from a JSON file.
//!
//! The file lives in the standard configuration directory
//! (`~/.config/checkout-overlay/config.json` on most platforms) unless
//! `CHECKOUT_CONFIG_PATH` points elsewhere. A missing file yields defaults;
//! a malformed file is reported and also yields defaults so the page always
//! comes up.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use checkout_types::Product;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::path_processing::{app_config_dir, expand_tilde};

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "CHECKOUT_CONFIG_PATH";

/// Default filename for the JSON payload.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Delay of the simulated payment call when nothing else is configured.
pub const DEFAULT_SUBMISSION_DELAY_MS: u64 = 1500;

const DEFAULT_FAILURE_MESSAGE: &str = "Your card was declined. Please check the details and try again.";

/// Error surfaced when reading the configuration fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure (for example, permissions).
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// How the simulated payment collaborator settles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOutcome {
    #[default]
    Succeed,
    Fail,
}

/// Persisted configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Delay before the simulated payment settles, in milliseconds.
    pub submission_delay_ms: u64,
    pub payment_outcome: PaymentOutcome,
    /// Message reported when `payment_outcome` is `fail`.
    pub failure_message: String,
    /// Products shown on the catalog page.
    pub catalog: Vec<Product>,
    /// Canonical identifier of the preferred theme.
    pub theme: Option<String>,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            submission_delay_ms: DEFAULT_SUBMISSION_DELAY_MS,
            payment_outcome: PaymentOutcome::default(),
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            catalog: default_catalog(),
            theme: None,
        }
    }
}

impl CheckoutConfig {
    /// Load from `CHECKOUT_CONFIG_PATH` or the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Load from an explicit path. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str::<CheckoutConfig>(&data) {
                Ok(config) => config,
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "Failed to parse config file; using defaults"
                    );
                    CheckoutConfig::default()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => CheckoutConfig::default(),
            Err(error) => return Err(ConfigError::Io(error)),
        };
        Ok(config.normalized())
    }

    pub fn submission_delay(&self) -> Duration {
        Duration::from_millis(self.submission_delay_ms)
    }

    fn normalized(mut self) -> Self {
        if self.catalog.is_empty() {
            warn!("Configured catalog is empty; falling back to the default catalog");
            self.catalog = default_catalog();
        }
        if self.failure_message.trim().is_empty() {
            self.failure_message = DEFAULT_FAILURE_MESSAGE.to_string();
        }
        self
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    app_config_dir().join(CONFIG_FILE_NAME)
}

/// Catalog used when none is configured.
pub fn default_catalog() -> Vec<Product> {
    vec![
        Product {
            name: "Widget".to_string(),
            price: "$10".to_string(),
            description: Some("A dependable everyday widget.".to_string()),
        },
        Product {
            name: "Gadget Pro".to_string(),
            price: "$49".to_string(),
            description: Some("Twice the gadget, half the fuss.".to_string()),
        },
        Product {
            name: "Gizmo Kit".to_string(),
            price: "$125".to_string(),
            description: Some("Everything needed to build your own gizmo.".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = CheckoutConfig::load_from(&dir.path().join("absent.json")).expect("load");
        assert_eq!(config, CheckoutConfig::default());
        assert_eq!(config.submission_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"submission_delay_ms": 20, "payment_outcome": "fail"}}"#).expect("write");
        let config = CheckoutConfig::load_from(file.path()).expect("load");
        assert_eq!(config.submission_delay_ms, 20);
        assert_eq!(config.payment_outcome, PaymentOutcome::Fail);
        assert_eq!(config.catalog, default_catalog());
        assert!(!config.failure_message.is_empty());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{ not json").expect("write");
        let config = CheckoutConfig::load_from(file.path()).expect("load");
        assert_eq!(config, CheckoutConfig::default());
    }

    #[test]
    fn empty_catalog_is_replaced() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"catalog": []}}"#).expect("write");
        let config = CheckoutConfig::load_from(file.path()).expect("load");
        assert_eq!(config.catalog.len(), 3);
    }

    #[test]
    fn env_override_selects_path() {
        temp_env::with_var(CONFIG_PATH_ENV, Some("/tmp/checkout-test/config.json"), || {
            assert_eq!(default_config_path(), PathBuf::from("/tmp/checkout-test/config.json"));
        });
        temp_env::with_var(CONFIG_PATH_ENV, Some("   "), || {
            assert!(default_config_path().ends_with(CONFIG_FILE_NAME));
        });
    }
}
