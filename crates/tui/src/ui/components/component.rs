//! Component system for the checkout TUI.
//!
//! Components are self-contained pieces of the screen. They translate input
//! into controller operations, render the part of the page they own, and
//! report side effects back to the runtime as `Effect`s rather than acting on
//! them directly.

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::app::App;
use checkout_types::{Effect, Msg};

/// A UI component with its own layout and rendering.
///
/// # Component Lifecycle
///
/// 1. **Event Handling**: key and mouse input arrive through the handlers
/// 2. **Messages**: `handle_message` receives application-level messages
/// 3. **Rendering**: `render` draws into the provided area and registers the
///    click targets it drew in `App::hits`
pub(crate) trait Component {
    /// Handle an application-level message the component cares about.
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events when this component is on top.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events when this component is on top.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the hints bar while this component is on top.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// Splits `area` into the regions the component renders into.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        vec![area]
    }
}
