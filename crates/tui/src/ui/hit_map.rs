//! Screen regions recorded during rendering, used to route mouse clicks.

use checkout_engine::ElementId;
use checkout_types::OverlayId;
use ratatui::layout::{Position, Rect};

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Control(ElementId),
    /// Inside a dialog's content but not on a control.
    Inside(OverlayId),
    /// Outside the topmost dialog's content: its backdrop.
    Backdrop(OverlayId),
    /// Empty page area with no dialog open.
    Page,
}

/// Rebuilt on every frame. Later registrations sit on top of earlier ones.
#[derive(Debug, Default, Clone)]
pub struct HitMap {
    controls: Vec<(Rect, ElementId)>,
    layers: Vec<(OverlayId, Rect)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.controls.clear();
        self.layers.clear();
    }

    pub fn register_control(&mut self, area: Rect, element: ElementId) {
        if !area.is_empty() {
            self.controls.push((area, element));
        }
    }

    /// Records the content box of a rendered dialog.
    pub fn register_layer(&mut self, overlay: OverlayId, content: Rect) {
        self.layers.push((overlay, content));
    }

    pub fn layer(&self, overlay: OverlayId) -> Option<Rect> {
        self.layers
            .iter()
            .rev()
            .find(|(id, _)| *id == overlay)
            .map(|(_, area)| *area)
    }

    /// Resolves a click, given the overlay that currently sits on top.
    pub fn resolve(&self, position: Position, topmost: Option<OverlayId>) -> Hit {
        if let Some(top) = topmost {
            let Some(content) = self.layer(top) else {
                return Hit::Backdrop(top);
            };
            if !content.contains(position) {
                return Hit::Backdrop(top);
            }
            return self
                .control_at(position, Some(content))
                .map_or(Hit::Inside(top), Hit::Control);
        }
        self.control_at(position, None).map_or(Hit::Page, Hit::Control)
    }

    fn control_at(&self, position: Position, within: Option<Rect>) -> Option<ElementId> {
        self.controls
            .iter()
            .rev()
            .filter(|(area, _)| within.is_none_or(|bounds| bounds.contains(area.as_position())))
            .find(|(area, _)| area.contains(position))
            .map(|(_, element)| *element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_engine::{Document, Element};

    fn elements() -> (ElementId, ElementId) {
        let mut doc = Document::new();
        let root = doc.root();
        let page_button = doc.append(root, Element::button("Buy now")).expect("page button");
        let dialog_button = doc.append(root, Element::button("Pay")).expect("dialog button");
        (page_button, dialog_button)
    }

    #[test]
    fn page_clicks_hit_controls_when_nothing_is_open() {
        let (page_button, _) = elements();
        let mut hits = HitMap::default();
        hits.register_control(Rect::new(2, 2, 10, 3), page_button);
        assert_eq!(hits.resolve(Position::new(3, 3), None), Hit::Control(page_button));
        assert_eq!(hits.resolve(Position::new(40, 3), None), Hit::Page);
    }

    #[test]
    fn topmost_dialog_shields_the_page() {
        let (page_button, dialog_button) = elements();
        let mut hits = HitMap::default();
        hits.register_control(Rect::new(2, 2, 10, 3), page_button);
        hits.register_layer(OverlayId::Buy, Rect::new(20, 5, 30, 10));
        hits.register_control(Rect::new(22, 10, 8, 3), dialog_button);

        let top = Some(OverlayId::Buy);
        assert_eq!(hits.resolve(Position::new(3, 3), top), Hit::Backdrop(OverlayId::Buy));
        assert_eq!(hits.resolve(Position::new(23, 11), top), Hit::Control(dialog_button));
        assert_eq!(hits.resolve(Position::new(45, 6), top), Hit::Inside(OverlayId::Buy));
    }

    #[test]
    fn clear_forgets_previous_frame() {
        let (page_button, _) = elements();
        let mut hits = HitMap::default();
        hits.register_control(Rect::new(0, 0, 5, 1), page_button);
        hits.clear();
        assert_eq!(hits.resolve(Position::new(1, 0), None), Hit::Page);
    }
}
