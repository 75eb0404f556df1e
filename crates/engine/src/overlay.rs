//! Per-dialog visibility and trigger anchors.

use checkout_types::{OverlayId, Visibility};

use crate::document::ElementId;

/// Order in which open overlays are consulted for global triggers: the
/// confirmation first, then the informational dialogs, then `buy`.
pub const PRIORITY_ORDER: [OverlayId; 4] = [OverlayId::Confirm, OverlayId::Tos, OverlayId::Wcag, OverlayId::Buy];

/// Elements making up a dialog on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlaySurface {
    /// Full-screen layer behind the content; it is also the dialog root, so
    /// hiding it hides the whole dialog.
    pub backdrop: ElementId,
    /// The dialog box itself.
    pub content: ElementId,
    /// The designated close control (× in the header).
    pub close_control: Option<ElementId>,
}

/// One dialog's state.
///
/// The anchor is the element that held focus right before the overlay opened.
/// It is captured once per open and is owned by this overlay alone; another
/// overlay opening in the meantime cannot overwrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    visibility: Visibility,
    anchor: Option<ElementId>,
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Overlay {
    pub fn new() -> Self {
        Self {
            visibility: Visibility::Closed,
            anchor: None,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_open(&self) -> bool {
        self.visibility.is_open()
    }

    pub fn anchor(&self) -> Option<ElementId> {
        self.anchor
    }

    /// Marks the overlay open. The anchor is only recorded on a closed→open
    /// transition; returns `false` (keeping the existing anchor) when the
    /// overlay was already open.
    pub fn mark_open(&mut self, anchor: Option<ElementId>) -> bool {
        if self.is_open() {
            return false;
        }
        self.visibility = Visibility::Open;
        self.anchor = anchor;
        true
    }

    /// Marks the overlay closed and hands back its anchor.
    pub fn mark_closed(&mut self) -> Option<ElementId> {
        self.visibility = Visibility::Closed;
        self.anchor.take()
    }
}

/// The four overlays of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayStates {
    overlays: [Overlay; 4],
}

impl Default for OverlayStates {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayStates {
    pub fn new() -> Self {
        Self {
            overlays: std::array::from_fn(|_| Overlay::new()),
        }
    }

    fn index(id: OverlayId) -> usize {
        match id {
            OverlayId::Buy => 0,
            OverlayId::Tos => 1,
            OverlayId::Wcag => 2,
            OverlayId::Confirm => 3,
        }
    }

    pub fn get(&self, id: OverlayId) -> &Overlay {
        &self.overlays[Self::index(id)]
    }

    pub fn get_mut(&mut self, id: OverlayId) -> &mut Overlay {
        &mut self.overlays[Self::index(id)]
    }

    pub fn is_open(&self, id: OverlayId) -> bool {
        self.get(id).is_open()
    }

    pub fn any_open(&self) -> bool {
        self.overlays.iter().any(Overlay::is_open)
    }

    /// The open overlay a global trigger would reach first.
    pub fn topmost(&self) -> Option<OverlayId> {
        PRIORITY_ORDER.into_iter().find(|id| self.is_open(*id))
    }

    /// Whether an overlay ranked above `id` is open.
    pub fn is_covered(&self, id: OverlayId) -> bool {
        OverlayId::ALL
            .into_iter()
            .any(|other| other.priority() > id.priority() && self.is_open(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_is_not_overwritten_while_open() {
        let mut states = OverlayStates::new();
        let (first, second) = anchors();
        assert!(states.get_mut(OverlayId::Buy).mark_open(Some(first)));
        assert!(!states.get_mut(OverlayId::Buy).mark_open(Some(second)));
        assert_eq!(states.get(OverlayId::Buy).anchor(), Some(first));
        assert_eq!(states.get_mut(OverlayId::Buy).mark_closed(), Some(first));
        assert_eq!(states.get(OverlayId::Buy).anchor(), None);
    }

    #[test]
    fn anchors_are_per_overlay() {
        let mut states = OverlayStates::new();
        let (first, second) = anchors();
        states.get_mut(OverlayId::Buy).mark_open(Some(first));
        states.get_mut(OverlayId::Wcag).mark_open(Some(second));
        assert_eq!(states.get(OverlayId::Buy).anchor(), Some(first));
        assert_eq!(states.get(OverlayId::Wcag).anchor(), Some(second));
    }

    #[test]
    fn topmost_follows_priority() {
        let mut states = OverlayStates::new();
        assert_eq!(states.topmost(), None);
        states.get_mut(OverlayId::Buy).mark_open(None);
        assert_eq!(states.topmost(), Some(OverlayId::Buy));
        states.get_mut(OverlayId::Wcag).mark_open(None);
        assert_eq!(states.topmost(), Some(OverlayId::Wcag));
        states.get_mut(OverlayId::Tos).mark_open(None);
        assert_eq!(states.topmost(), Some(OverlayId::Tos));
        states.get_mut(OverlayId::Confirm).mark_open(None);
        assert_eq!(states.topmost(), Some(OverlayId::Confirm));
        assert!(states.is_covered(OverlayId::Buy));
        assert!(states.is_covered(OverlayId::Tos));
        assert!(!states.is_covered(OverlayId::Confirm));
    }

    fn anchors() -> (ElementId, ElementId) {
        let mut doc = crate::document::Document::new();
        let root = doc.root();
        let first = doc.append(root, crate::document::Element::button("a")).expect("a");
        let second = doc.append(root, crate::document::Element::button("b")).expect("b");
        (first, second)
    }
}
