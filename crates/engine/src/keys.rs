//! Keyboard input as seen by the controller, independent of any terminal or
//! windowing backend.

/// A single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    /// Shift+Tab.
    BackTab,
    Escape,
    Enter,
    Space,
    Backspace,
    Char(char),
    /// Anything the controller does not react to.
    Other,
}

/// Whether a handler consumed a key (suppressing the default action).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    Handled,
    Ignored,
}

impl KeyDisposition {
    pub fn is_handled(self) -> bool {
        matches!(self, KeyDisposition::Handled)
    }
}
