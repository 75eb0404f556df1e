use checkout_types::OverlayId;
use thiserror::Error;

use crate::document::ElementId;

/// Failures raised by `Document` primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("element {0} is not in the document")]
    NotFound(ElementId),
    #[error("element {0} cannot receive focus")]
    NotFocusable(ElementId),
    #[error("the document root cannot be removed")]
    RootRemoval,
}

/// Reasons an overlay transition could not be carried out.
///
/// None of these are fatal: public session operations log them and leave the
/// page as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// The dialog surface for this overlay is not part of the page.
    #[error("{0} dialog is missing from the page")]
    MissingSurface(OverlayId),
    /// A control the transition needs is absent.
    #[error("{overlay} dialog is missing its {control}")]
    MissingElement { overlay: OverlayId, control: &'static str },
    /// The element focus should return to no longer exists or cannot take focus.
    #[error("focus target {0} is stale")]
    StaleFocus(ElementId),
    /// A nested overlay was requested while its parent is closed.
    #[error("{overlay} can only open while {parent} is open")]
    ParentClosed { overlay: OverlayId, parent: OverlayId },
    #[error(transparent)]
    Document(#[from] DocumentError),
}
