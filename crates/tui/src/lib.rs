//! # Checkout TUI
//!
//! Terminal front-end for the checkout overlay controller. The storefront,
//! the checkout dialog and its nested dialogs are drawn with ratatui; key
//! presses and mouse clicks are translated into controller operations, and
//! payments run in the background through a [`PaymentGateway`].
//!
//! ## Architecture
//!
//! Each dialog is a component that renders one overlay of the controller's
//! page and records its click targets. Components hand `Effect`s back to the
//! runtime, which owns the terminal and the in-flight payment tasks.

mod app;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use checkout_engine::PaymentGateway;
use checkout_util::CheckoutConfig;

pub use ui::theme::THEME_IDS;

/// Runs the checkout UI until the user quits.
///
/// The palette comes from `CHECKOUT_THEME` when set, otherwise from
/// `config.theme`.
///
/// # Errors
///
/// Fails when the page cannot be built from `config` or the terminal cannot
/// be set up or restored.
pub async fn run(config: CheckoutConfig, gateway: Arc<dyn PaymentGateway>) -> Result<()> {
    let theme = ui::theme::load(config.theme.as_deref());
    ui::runtime::run_app(config, theme, gateway).await
}
