//! # Checkout Engine
//!
//! Overlay controller for a single-page storefront checkout. The page is
//! modelled as a headless [`Document`]; the controller keeps four dialogs on
//! top of it (`buy`, `tos`, `wcag` and `confirm`) and enforces their rules:
//!
//! - each open dialog traps Tab navigation inside itself;
//! - Escape and backdrop clicks reach exactly one dialog, in the order
//!   `confirm > {tos, wcag} > buy`;
//! - closing a `buy` form with unsaved edits asks for confirmation first;
//! - focus returns to the element that opened a dialog, when it still can.
//!
//! ## Usage
//!
//! ```rust
//! use checkout_engine::{CheckoutSession, Key};
//! use checkout_types::{OverlayId, Product};
//!
//! let mut session = CheckoutSession::new(&[Product::new("Widget", "$10")])?;
//! session.open_buy(0);
//! session.handle_key(Key::Char('A'));
//! session.handle_key(Key::Escape);
//! assert!(session.is_open(OverlayId::Confirm));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`document`**: element tree, visibility and the focus slot
//! - **`page`**: builds the storefront into a document and maps controls to actions
//! - **`overlay`**, **`router`**: per-dialog state and global trigger resolution
//! - **`focus_trap`**, **`dirty_guard`**: Tab containment and unsaved-edit tracking
//! - **`submission`**: payment collaborator and in-flight bookkeeping
//! - **`session`**: the controller tying everything together

pub mod dirty_guard;
pub mod document;
pub mod error;
pub mod focus_trap;
pub mod keys;
pub mod overlay;
pub mod page;
pub mod router;
pub mod session;
pub mod submission;

pub use dirty_guard::DirtyGuard;
pub use document::{Document, Element, ElementId, ElementKind};
pub use error::{DocumentError, OverlayError};
pub use focus_trap::{FocusTrap, TrapRegistry};
pub use keys::{Key, KeyDisposition};
pub use overlay::{Overlay, OverlayStates, OverlaySurface, PRIORITY_ORDER};
pub use page::{BuyDialog, BuyForm, CheckoutPage, ConfirmDialog, InfoDialog, PageAction, PageBuilder, ProductCard};
pub use router::{GlobalTrigger, RouteAction, route};
pub use session::{CheckoutSession, FieldEdit, Outcome, Transition};
pub use submission::{PaymentGateway, SimulatedGateway, SubmissionState};
