//! Headless element tree standing in for the host page.
//!
//! The controller never touches a real rendering surface. Instead it reads and
//! mutates a `Document`: a tree of elements carrying an interactive kind,
//! visibility, tab order, text and form values, plus the single element that
//! currently holds keyboard focus. The terminal front-end renders this tree and
//! feeds user input back into it.
//!
//! Invariants
//! - Element ids are never reused; a removed element stays unknown forever.
//! - Only reachable (no hidden ancestor), enabled, focusable elements can be
//!   the active element. Hiding or removing a subtree that contains the active
//!   element clears focus.

use std::fmt;

use indexmap::IndexMap;

use crate::error::DocumentError;

/// Opaque handle to an element in a `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// Interactive role of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Grouping element (sections, dialogs, cards).
    Container,
    /// Static text.
    Text,
    Button,
    /// Hyperlink; only links with a target participate in tab order.
    Link { has_target: bool },
    /// Single-line text field.
    Input,
    Checkbox,
}

impl ElementKind {
    fn is_interactive(self) -> bool {
        match self {
            ElementKind::Button | ElementKind::Input | ElementKind::Checkbox => true,
            ElementKind::Link { has_target } => has_target,
            ElementKind::Container | ElementKind::Text => false,
        }
    }
}

/// A node in the document tree.
#[derive(Debug, Clone)]
pub struct Element {
    pub kind: ElementKind,
    /// Form field name for inputs and checkboxes.
    pub name: Option<String>,
    /// Display text: button label, link text, field label, paragraph body.
    pub text: String,
    /// Current value of an input.
    pub value: String,
    pub checked: bool,
    pub hidden: bool,
    pub disabled: bool,
    pub tab_index: Option<i32>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            name: None,
            text: String::new(),
            value: String::new(),
            checked: false,
            hidden: false,
            disabled: false,
            tab_index: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn container() -> Self {
        Self::new(ElementKind::Container)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Text).with_text(text)
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self::new(ElementKind::Button).with_text(label)
    }

    pub fn link(label: impl Into<String>) -> Self {
        Self::new(ElementKind::Link { has_target: true }).with_text(label)
    }

    pub fn input(name: impl Into<String>, label: impl Into<String>) -> Self {
        let mut element = Self::new(ElementKind::Input).with_text(label);
        element.name = Some(name.into());
        element
    }

    pub fn checkbox(name: impl Into<String>, label: impl Into<String>) -> Self {
        let mut element = Self::new(ElementKind::Checkbox).with_text(label);
        element.name = Some(name.into());
        element
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Whether the element matches the interactive-role predicate, ignoring
    /// visibility and disabled state.
    pub fn matches_focusable_role(&self) -> bool {
        match self.tab_index {
            Some(index) if index < 0 => false,
            Some(_) => true,
            None => self.kind.is_interactive(),
        }
    }
}

/// Element tree with a single focus slot.
#[derive(Debug, Clone)]
pub struct Document {
    elements: IndexMap<ElementId, Element>,
    root: ElementId,
    active: Option<ElementId>,
    next_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding only an empty root container.
    pub fn new() -> Self {
        let root = ElementId(0);
        let mut elements = IndexMap::new();
        elements.insert(root, Element::container());
        Self {
            elements,
            root,
            active: None,
            next_id: 1,
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Appends `element` as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, mut element: Element) -> Result<ElementId, DocumentError> {
        if !self.elements.contains_key(&parent) {
            return Err(DocumentError::NotFound(parent));
        }
        let id = ElementId(self.next_id);
        self.next_id += 1;
        element.parent = Some(parent);
        element.children.clear();
        self.elements.insert(id, element);
        if let Some(parent_element) = self.elements.get_mut(&parent) {
            parent_element.children.push(id);
        }
        Ok(id)
    }

    /// Removes an element and its whole subtree. Focus inside the subtree is cleared.
    pub fn remove(&mut self, id: ElementId) -> Result<(), DocumentError> {
        if id == self.root {
            return Err(DocumentError::RootRemoval);
        }
        let parent = self.get(id).ok_or(DocumentError::NotFound(id))?.parent;
        let subtree = self.subtree(id);
        if self.active.is_some_and(|active| subtree.contains(&active)) {
            self.active = None;
        }
        for node in subtree {
            self.elements.shift_remove(&node);
        }
        if let Some(parent_element) = parent.and_then(|parent| self.elements.get_mut(&parent)) {
            parent_element.children.retain(|child| *child != id);
        }
        Ok(())
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    fn require(&self, id: ElementId) -> Result<&Element, DocumentError> {
        self.get(id).ok_or(DocumentError::NotFound(id))
    }

    fn require_mut(&mut self, id: ElementId) -> Result<&mut Element, DocumentError> {
        self.elements.get_mut(&id).ok_or(DocumentError::NotFound(id))
    }

    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) -> Result<(), DocumentError> {
        self.require_mut(id)?.hidden = hidden;
        if hidden && self.active.is_some_and(|active| self.is_inside(active, id)) {
            self.active = None;
        }
        Ok(())
    }

    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) -> Result<(), DocumentError> {
        self.require_mut(id)?.disabled = disabled;
        if disabled && self.active == Some(id) {
            self.active = None;
        }
        Ok(())
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) -> Result<(), DocumentError> {
        self.require_mut(id)?.text = text.into();
        Ok(())
    }

    pub fn set_value(&mut self, id: ElementId, value: impl Into<String>) -> Result<(), DocumentError> {
        self.require_mut(id)?.value = value.into();
        Ok(())
    }

    pub fn set_checked(&mut self, id: ElementId, checked: bool) -> Result<(), DocumentError> {
        self.require_mut(id)?.checked = checked;
        Ok(())
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|element| element.text.as_str())
    }

    pub fn value(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|element| element.value.as_str())
    }

    /// True when `id` is `ancestor` or one of its descendants.
    pub fn is_inside(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(Element::parent);
        }
        false
    }

    /// The element exists and neither it nor any ancestor is hidden.
    pub fn is_reachable(&self, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            match self.get(current) {
                Some(element) if !element.hidden => cursor = element.parent,
                _ => return false,
            }
        }
        true
    }

    /// Whether the element can hold focus right now.
    pub fn is_focusable(&self, id: ElementId) -> bool {
        self.get(id)
            .is_some_and(|element| element.matches_focusable_role() && !element.disabled)
            && self.is_reachable(id)
    }

    pub fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    pub fn focus(&mut self, id: ElementId) -> Result<(), DocumentError> {
        self.require(id)?;
        if !self.is_focusable(id) {
            return Err(DocumentError::NotFocusable(id));
        }
        self.active = Some(id);
        Ok(())
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Focusable descendants of `container` (excluding the container itself)
    /// in document order.
    pub fn focusable_within(&self, container: ElementId) -> Vec<ElementId> {
        self.subtree(container)
            .into_iter()
            .skip(1)
            .filter(|id| self.is_focusable(*id))
            .collect()
    }

    /// Default sequential navigation over the whole document, wrapping at the
    /// ends. Returns the newly focused element.
    pub fn focus_next(&mut self, reverse: bool) -> Option<ElementId> {
        let order = self.focusable_within(self.root);
        if order.is_empty() {
            return None;
        }
        let position = self.active.and_then(|active| order.iter().position(|id| *id == active));
        let next = match (position, reverse) {
            (Some(index), false) => order[(index + 1) % order.len()],
            (Some(index), true) => order[(index + order.len() - 1) % order.len()],
            (None, false) => order[0],
            (None, true) => order[order.len() - 1],
        };
        self.active = Some(next);
        Some(next)
    }

    /// Pre-order traversal of `id` and its descendants.
    fn subtree(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(element) = self.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(element.children.iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        let root = doc.root();
        let dialog = doc.append(root, Element::container()).expect("dialog");
        let input = doc.append(dialog, Element::input("email", "Email")).expect("input");
        doc.append(dialog, Element::text("Fine print")).expect("label");
        let button = doc.append(dialog, Element::button("Pay")).expect("button");
        (doc, dialog, input, button)
    }

    #[test]
    fn focusable_predicate_respects_roles_and_tab_index() {
        let mut doc = Document::new();
        let root = doc.root();
        let text = doc.append(root, Element::text("plain")).expect("text");
        let tabbable_text = doc.append(root, Element::text("card").with_tab_index(0)).expect("tabbable");
        let skipped = doc.append(root, Element::button("skip").with_tab_index(-1)).expect("skipped");
        let dead_link = doc.append(root, Element::new(ElementKind::Link { has_target: false })).expect("link");
        assert!(!doc.is_focusable(text));
        assert!(doc.is_focusable(tabbable_text));
        assert!(!doc.is_focusable(skipped));
        assert!(!doc.is_focusable(dead_link));
    }

    #[test]
    fn hidden_ancestor_makes_element_unreachable() {
        let (mut doc, dialog, input, _) = sample();
        assert!(doc.is_reachable(input));
        doc.set_hidden(dialog, true).expect("hide");
        assert!(!doc.is_reachable(input));
        assert_eq!(doc.focus(input), Err(DocumentError::NotFocusable(input)));
    }

    #[test]
    fn hiding_a_subtree_clears_focus_inside_it() {
        let (mut doc, dialog, input, _) = sample();
        doc.focus(input).expect("focus");
        doc.set_hidden(dialog, true).expect("hide");
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn removed_elements_are_gone_for_good() {
        let (mut doc, dialog, input, button) = sample();
        doc.focus(button).expect("focus");
        doc.remove(dialog).expect("remove");
        assert!(!doc.contains(input));
        assert_eq!(doc.active_element(), None);
        assert_eq!(doc.focus(button), Err(DocumentError::NotFound(button)));
        assert_eq!(doc.remove(doc.root()), Err(DocumentError::RootRemoval));
    }

    #[test]
    fn focusable_within_uses_document_order() {
        let (mut doc, dialog, input, button) = sample();
        let nested = doc.append(dialog, Element::container()).expect("nested");
        let link = doc.append(nested, Element::link("Terms")).expect("link");
        assert_eq!(doc.focusable_within(dialog), vec![input, button, link]);
    }

    #[test]
    fn sequential_navigation_wraps_and_skips_disabled() {
        let (mut doc, _, input, button) = sample();
        assert_eq!(doc.focus_next(false), Some(input));
        assert_eq!(doc.focus_next(false), Some(button));
        assert_eq!(doc.focus_next(false), Some(input));
        doc.set_disabled(button, true).expect("disable");
        assert_eq!(doc.focus_next(true), Some(input));
    }

    #[test]
    fn appending_to_missing_parent_fails() {
        let (mut doc, dialog, _, _) = sample();
        doc.remove(dialog).expect("remove");
        assert_eq!(
            doc.append(dialog, Element::text("orphan")).map(|_| ()),
            Err(DocumentError::NotFound(dialog))
        );
    }
}
