//! Translation of terminal key events into controller keys.

use checkout_engine::Key;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Ctrl+C quits regardless of what is open.
pub fn is_quit_chord(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn to_key(key: KeyEvent) -> Key {
    match key.code {
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Key::BackTab,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Esc => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => Key::Other,
        KeyCode::Char(ch) => Key::Char(ch),
        _ => Key::Other,
    }
}
