//! Shared vocabulary for the checkout overlay workspace.
//!
//! The engine, the terminal front-end and the binary all speak in terms of
//! the types defined here: overlay identities, catalog products, payment
//! requests/outcomes, and the `Msg`/`Effect` pair that carries work between
//! the UI event loop and asynchronous collaborators.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of one of the four dialogs the controller manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayId {
    /// Primary checkout dialog containing the payment form.
    Buy,
    /// Terms-of-service statement, opened from inside `Buy`.
    Tos,
    /// Accessibility statement, openable from anywhere on the page.
    Wcag,
    /// Unsaved-changes confirmation guarding `Buy`.
    Confirm,
}

impl OverlayId {
    /// Every overlay, ordered from the lowest to the highest layer.
    pub const ALL: [OverlayId; 4] = [OverlayId::Buy, OverlayId::Tos, OverlayId::Wcag, OverlayId::Confirm];

    /// Precedence used when a global trigger (Escape, backdrop click) must be
    /// resolved to a single overlay. Higher wins.
    pub const fn priority(self) -> u8 {
        match self {
            OverlayId::Buy => 0,
            OverlayId::Tos | OverlayId::Wcag => 1,
            OverlayId::Confirm => 2,
        }
    }

    /// Overlays that may only be open while this one is open.
    pub const fn children(self) -> &'static [OverlayId] {
        match self {
            OverlayId::Buy => &[OverlayId::Tos, OverlayId::Confirm],
            _ => &[],
        }
    }

    /// The overlay that must be open for this one to open, if any.
    pub const fn parent(self) -> Option<OverlayId> {
        match self {
            OverlayId::Tos | OverlayId::Confirm => Some(OverlayId::Buy),
            OverlayId::Buy | OverlayId::Wcag => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            OverlayId::Buy => "buy",
            OverlayId::Tos => "tos",
            OverlayId::Wcag => "wcag",
            OverlayId::Confirm => "confirm",
        }
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility of an overlay. Closed is the resting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    Open,
    #[default]
    Closed,
}

impl Visibility {
    pub fn is_open(self) -> bool {
        matches!(self, Visibility::Open)
    }
}

/// A purchasable catalog item as displayed on a product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name (e.g., "Widget").
    pub name: String,
    /// Pre-formatted price string (e.g., "$10").
    pub price: String,
    /// Optional one-line blurb shown on the card.
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            description: None,
        }
    }
}

/// Identifies one in-flight payment. Tickets are never reused within a session,
/// so a settlement carrying an outdated ticket can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionTicket(pub u64);

impl fmt::Display for SubmissionTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Form data handed to the payment collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub product: Product,
    /// Form field values keyed by field name, in form order.
    pub fields: IndexMap<String, String>,
}

/// Successful payment confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub reference: String,
    pub product: Product,
    pub settled_at: DateTime<Utc>,
}

/// Recoverable payment failure. The form stays intact when one is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("payment declined: {0}")]
    Declined(String),
    #[error("payment service unavailable: {0}")]
    Unavailable(String),
}

/// Messages delivered to the application from the event loop or from
/// completed background work.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (e.g., throbbers)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// A payment started with `ticket` finished.
    PaymentSettled {
        ticket: SubmissionTicket,
        result: Result<Receipt, PaymentError>,
    },
}

/// Side effects requested by state changes and executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the payment collaborator for this ticket.
    SubmitPayment {
        ticket: SubmissionTicket,
        request: PaymentRequest,
    },
    /// Abandon the in-flight payment for this ticket.
    CancelSubmission(SubmissionTicket),
    /// Leave the application.
    Quit,
}
