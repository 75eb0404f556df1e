//! Application state for the checkout TUI.
//!
//! `App` owns the overlay controller and everything the components need to
//! render it. Controller outcomes are folded in here so every input path
//! (keys, clicks, settled payments) produces effects the same way.

use anyhow::{Context, Result};
use checkout_engine::{CheckoutSession, Outcome};
use checkout_types::{Effect, Msg, Visibility};
use checkout_util::CheckoutConfig;
use tracing::debug;

use crate::ui::hit_map::HitMap;
use crate::ui::theme::Theme;

/// Frames of the processing indicator shown while a payment is in flight.
pub const THROBBER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

/// Cross-cutting shared context owned by the App.
#[derive(Debug)]
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
}

#[derive(Debug)]
pub struct App {
    pub ctx: SharedCtx,
    /// The overlay controller and its page.
    pub session: CheckoutSession,
    /// Click targets recorded by the last render.
    pub hits: HitMap,
    pub throbber_idx: usize,
}

impl App {
    pub fn new(config: &CheckoutConfig, theme: Box<dyn Theme>) -> Result<Self> {
        let session = CheckoutSession::new(&config.catalog).context("failed to build the checkout page")?;
        Ok(Self {
            ctx: SharedCtx { theme },
            session,
            hits: HitMap::default(),
            throbber_idx: 0,
        })
    }

    /// Whether a payment is in flight.
    pub fn is_processing(&self) -> bool {
        self.session.pending_submission().is_some()
    }

    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.is_processing() {
                    self.throbber_idx = (self.throbber_idx + 1) % THROBBER.len();
                }
                Vec::new()
            }
            Msg::Resize(..) => Vec::new(),
            Msg::PaymentSettled { ticket, result } => {
                let outcome = self.session.settle_payment(*ticket, result.clone());
                self.throbber_idx = 0;
                self.apply(outcome)
            }
        }
    }

    /// Logs the transitions of a controller outcome and hands back its effects.
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        for transition in &outcome.transitions {
            match transition.visibility {
                Visibility::Open => debug!(overlay = %transition.overlay, "overlay opened"),
                Visibility::Closed => debug!(overlay = %transition.overlay, "overlay closed"),
            }
        }
        outcome.effects
    }
}
