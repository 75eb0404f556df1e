use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use checkout_engine::SimulatedGateway;
use checkout_util::{CheckoutConfig, PaymentOutcome, default_log_path, expand_tilde};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Terminal storefront with an accessible checkout dialog.
#[derive(Debug, Parser)]
#[command(name = "checkout", version, about)]
struct Cli {
    /// Configuration file (defaults to CHECKOUT_CONFIG_PATH or the user config dir)
    #[arg(long, value_name = "PATH")]
    config: Option<String>,
    /// Delay of the simulated payment, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,
    /// Make every simulated payment fail
    #[arg(long)]
    fail_payments: bool,
    /// Theme id (dracula, dracula-high-contrast, nord)
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,
    /// Where diagnostics are written while the UI owns the terminal
    #[arg(long, value_name = "PATH")]
    log_file: Option<String>,
}

impl Cli {
    fn load_config(&self) -> Result<CheckoutConfig> {
        let config = match self.config.as_deref() {
            Some(path) => {
                let path = expand_tilde(path);
                CheckoutConfig::load_from(&path).with_context(|| format!("failed to read config {}", path.display()))?
            }
            None => CheckoutConfig::load().context("failed to read config")?,
        };
        Ok(self.apply_overrides(config))
    }

    /// Flags win over file values.
    fn apply_overrides(&self, mut config: CheckoutConfig) -> CheckoutConfig {
        if let Some(delay_ms) = self.delay_ms {
            config.submission_delay_ms = delay_ms;
        }
        if self.fail_payments {
            config.payment_outcome = PaymentOutcome::Fail;
        }
        if let Some(theme) = &self.theme {
            config.theme = Some(theme.clone());
        }
        config
    }

    fn log_path(&self) -> PathBuf {
        self.log_file.as_deref().map(expand_tilde).unwrap_or_else(default_log_path)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_path())?;

    let config = cli.load_config()?;
    info!(
        products = config.catalog.len(),
        delay_ms = config.submission_delay_ms,
        outcome = ?config.payment_outcome,
        "Starting checkout"
    );
    let gateway = Arc::new(SimulatedGateway::from_config(&config));
    checkout_tui::run(config, gateway).await
}

/// Logs go to a file because the terminal belongs to the UI.
fn init_tracing(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn flags_override_file_values() {
        let cli = Cli::try_parse_from(["checkout", "--delay-ms", "20", "--fail-payments", "--theme", "nord"]).expect("parse");
        let config = cli.apply_overrides(CheckoutConfig::default());
        assert_eq!(config.submission_delay(), Duration::from_millis(20));
        assert_eq!(config.payment_outcome, PaymentOutcome::Fail);
        assert_eq!(config.theme.as_deref(), Some("nord"));
    }

    #[test]
    fn no_flags_keep_the_file_values() {
        let cli = Cli::try_parse_from(["checkout"]).expect("parse");
        let file = CheckoutConfig {
            submission_delay_ms: 5,
            theme: Some("dracula".into()),
            ..CheckoutConfig::default()
        };
        assert_eq!(cli.apply_overrides(file.clone()), file);
        assert_eq!(cli.log_path(), default_log_path());
    }

    #[test]
    fn rejects_a_non_numeric_delay() {
        assert!(Cli::try_parse_from(["checkout", "--delay-ms", "soon"]).is_err());
    }
}
