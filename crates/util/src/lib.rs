//! Configuration loading and filesystem helpers shared by the checkout CLI
//! and terminal front-end.

pub mod config;
pub mod path_processing;

pub use config::{CheckoutConfig, ConfigError, PaymentOutcome};
pub use path_processing::{app_config_dir, default_log_path, expand_tilde};
