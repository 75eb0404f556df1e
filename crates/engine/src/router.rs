//! Resolution of page-wide triggers to exactly one overlay action.
//!
//! Both the Escape key and backdrop clicks go through [`route`], so the
//! precedence `confirm > {tos, wcag} > buy` is enforced identically for either
//! input path.

use checkout_types::OverlayId;

use crate::overlay::OverlayStates;

/// A global input that is not addressed to a specific control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalTrigger {
    Escape,
    /// Pointer-down on an overlay's backdrop, outside its content box.
    BackdropClick(OverlayId),
}

/// What the controller should do in response to a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    /// Dismiss the confirmation and return to the still-dirty form.
    KeepEditing,
    /// Run the overlay's normal close (the dirty guard may still intercept).
    Close(OverlayId),
    /// The trigger hit a layer covered by a higher-priority overlay.
    Swallow,
    /// Nothing is open that could react.
    Ignore,
}

pub fn route(states: &OverlayStates, trigger: GlobalTrigger) -> RouteAction {
    let target = match trigger {
        GlobalTrigger::Escape => match states.topmost() {
            Some(target) => target,
            None => return RouteAction::Ignore,
        },
        GlobalTrigger::BackdropClick(target) => {
            if !states.is_open(target) {
                return RouteAction::Ignore;
            }
            if states.is_covered(target) {
                return RouteAction::Swallow;
            }
            target
        }
    };

    match target {
        OverlayId::Confirm => RouteAction::KeepEditing,
        other => RouteAction::Close(other),
    }
}
