//! Cyclic Tab navigation scoped to a container.
//!
//! A trap snapshots the focusable descendants of its container when it is
//! engaged (the moment the overlay becomes visible). Tab on the last member
//! wraps to the first and Shift+Tab on the first wraps to the last; every
//! other key, and Tab anywhere in the middle, is left to default sequential
//! navigation.
//!
//! The membership snapshot is not refreshed while the overlay stays open.
//! Members that have since become hidden or disabled are skipped when the
//! boundaries are computed, but elements added after engagement are not
//! picked up until the container is engaged again.

use indexmap::IndexMap;
use tracing::debug;

use crate::document::{Document, ElementId};
use crate::keys::{Key, KeyDisposition};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTrap {
    container: ElementId,
    focusables: Vec<ElementId>,
}

impl FocusTrap {
    /// Snapshots the focusable descendants of `container`.
    pub fn engage(document: &Document, container: ElementId) -> Self {
        Self {
            container,
            focusables: document.focusable_within(container),
        }
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn focusables(&self) -> &[ElementId] {
        &self.focusables
    }

    /// First member that can currently hold focus.
    pub fn first(&self, document: &Document) -> Option<ElementId> {
        self.focusables.iter().copied().find(|id| document.is_focusable(*id))
    }

    /// Last member that can currently hold focus.
    pub fn last(&self, document: &Document) -> Option<ElementId> {
        self.focusables.iter().rev().copied().find(|id| document.is_focusable(*id))
    }

    /// Applies the wrap-around rule for Tab/Shift+Tab.
    pub fn handle_key(&self, document: &mut Document, key: Key) -> KeyDisposition {
        let reverse = match key {
            Key::Tab => false,
            Key::BackTab => true,
            _ => return KeyDisposition::Ignored,
        };
        let (Some(first), Some(last)) = (self.first(document), self.last(document)) else {
            return KeyDisposition::Ignored;
        };
        let Some(active) = document.active_element() else {
            return KeyDisposition::Ignored;
        };

        let (boundary, target) = if reverse { (first, last) } else { (last, first) };
        if active != boundary {
            return KeyDisposition::Ignored;
        }
        match document.focus(target) {
            Ok(()) => {
                debug!(container = %self.container, reverse, "Focus wrapped");
                KeyDisposition::Handled
            }
            Err(_) => KeyDisposition::Ignored,
        }
    }
}

/// One trap per container, registered at most once.
///
/// Engaging a container that already has a trap replaces its snapshot rather
/// than stacking a second handler. Traps whose container does not hold the
/// active element never react, so the traps of closed overlays stay inert.
#[derive(Debug, Default, Clone)]
pub struct TrapRegistry {
    traps: IndexMap<ElementId, FocusTrap>,
}

impl TrapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engage(&mut self, document: &Document, container: ElementId) -> &FocusTrap {
        let trap = FocusTrap::engage(document, container);
        self.traps.insert(container, trap);
        &self.traps[&container]
    }

    pub fn get(&self, container: ElementId) -> Option<&FocusTrap> {
        self.traps.get(&container)
    }

    pub fn len(&self) -> usize {
        self.traps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traps.is_empty()
    }

    /// Offers `key` to the trap whose container holds the active element.
    pub fn dispatch(&self, document: &mut Document, key: Key) -> KeyDisposition {
        let Some(active) = document.active_element() else {
            return KeyDisposition::Ignored;
        };
        let owner = self
            .traps
            .values()
            .filter(|trap| document.is_inside(active, trap.container))
            .max_by_key(|trap| depth(document, trap.container));
        match owner {
            Some(trap) => trap.handle_key(document, key),
            None => KeyDisposition::Ignored,
        }
    }
}

fn depth(document: &Document, id: ElementId) -> usize {
    let mut depth = 0;
    let mut cursor = document.get(id).and_then(|element| element.parent());
    while let Some(parent) = cursor {
        depth += 1;
        cursor = document.get(parent).and_then(|element| element.parent());
    }
    depth
}
