//! Renderers for individual page controls.
//!
//! Each helper draws one element of the controller's document and registers
//! its area as a click target.

use checkout_engine::ElementId;
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::ui::theme::theme_helpers::{self as th, ButtonRenderOptions, ButtonType};

pub fn is_focused(app: &App, element: ElementId) -> bool {
    app.session.document().active_element() == Some(element)
}

pub fn is_visible(app: &App, element: ElementId) -> bool {
    app.session.document().is_reachable(element)
}

pub fn text_of(app: &App, element: ElementId) -> String {
    app.session.document().text(element).unwrap_or_default().to_string()
}

/// Display width of an element's text, for laying out inline controls.
pub fn text_width(app: &App, element: ElementId) -> u16 {
    u16::try_from(text_of(app, element).width()).unwrap_or(u16::MAX)
}

pub fn render_button(frame: &mut Frame, area: Rect, app: &mut App, element: ElementId, button_type: ButtonType) {
    let Some(target) = app.session.document().get(element) else {
        return;
    };
    let label = target.text.clone();
    let enabled = !target.disabled;
    let focused = is_focused(app, element);
    th::render_button(
        frame,
        area,
        &label,
        &*app.ctx.theme,
        ButtonRenderOptions::new(enabled, focused, Borders::ALL, button_type),
    );
    app.hits.register_control(area, element);
}

/// Small borderless button used for the × close control in dialog headers.
pub fn render_close_control(frame: &mut Frame, area: Rect, app: &mut App, element: ElementId) {
    let focused = is_focused(app, element);
    let theme = &*app.ctx.theme;
    let style = if focused { theme.selection_style() } else { theme.text_secondary_style() };
    frame.render_widget(Paragraph::new(" × ").style(style), area);
    app.hits.register_control(area, element);
}

/// Renders a link at the start of `area` and returns the cells it used.
pub fn render_link(frame: &mut Frame, area: Rect, app: &mut App, element: ElementId) -> Rect {
    let label = text_of(app, element);
    let width = u16::try_from(label.width()).unwrap_or(u16::MAX).min(area.width);
    let link_area = Rect::new(area.x, area.y, width, 1.min(area.height));
    let style = app.ctx.theme.link_style(is_focused(app, element));
    frame.render_widget(Paragraph::new(Span::styled(label, style)), link_area);
    app.hits.register_control(link_area, element);
    link_area
}

/// Renders a checkbox with its label and returns the cells it used.
pub fn render_checkbox(frame: &mut Frame, area: Rect, app: &mut App, element: ElementId) -> Rect {
    let Some(target) = app.session.document().get(element) else {
        return Rect::new(area.x, area.y, 0, 0);
    };
    let mark = if target.checked { "[x] " } else { "[ ] " };
    let text = format!("{mark}{} ", target.text);
    let width = u16::try_from(text.width()).unwrap_or(u16::MAX).min(area.width);
    let checkbox_area = Rect::new(area.x, area.y, width, 1.min(area.height));
    let theme = &*app.ctx.theme;
    let style = if is_focused(app, element) {
        theme.selection_style()
    } else {
        theme.text_primary_style()
    };
    frame.render_widget(Paragraph::new(Line::styled(text, style)), checkbox_area);
    app.hits.register_control(checkbox_area, element);
    checkbox_area
}

/// Renders a bordered text field titled with the field's label. The cursor
/// is placed at the end of the value when the field has focus.
pub fn render_text_field(frame: &mut Frame, area: Rect, app: &mut App, element: ElementId) {
    let Some(target) = app.session.document().get(element) else {
        return;
    };
    let label = target.text.clone();
    let value = target.value.clone();
    let focused = is_focused(app, element);
    let theme = &*app.ctx.theme;
    let block = th::block(theme, Some(label.as_str()), focused);
    let inner = block.inner(area);
    frame.render_widget(
        Paragraph::new(value.as_str()).style(th::input_style(theme, focused)).block(block),
        area,
    );
    if focused {
        let offset = u16::try_from(value.width()).unwrap_or(u16::MAX);
        let x = inner.x.saturating_add(offset).min(inner.right().saturating_sub(1));
        frame.set_cursor_position(Position::new(x, inner.y));
    }
    app.hits.register_control(area, element);
}
