use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Style for text fields; the caller sets the block border based on focus.
pub fn input_style<T: Theme + ?Sized>(theme: &T, focused: bool) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    let style = Style::default().bg(surface).fg(text);
    if focused { style.add_modifier(Modifier::BOLD) } else { style }
}

/// Visual weight of a button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonType {
    /// Filled accent; the dialog's main action.
    Primary,
    #[default]
    Secondary,
    /// Destructive action.
    Danger,
}

#[derive(Debug, Clone, Copy)]
pub struct ButtonRenderOptions {
    pub enabled: bool,
    pub focused: bool,
    pub borders: Borders,
    pub button_type: ButtonType,
}

impl ButtonRenderOptions {
    pub fn new(enabled: bool, focused: bool, borders: Borders, button_type: ButtonType) -> Self {
        Self {
            enabled,
            focused,
            borders,
            button_type,
        }
    }
}

/// Style for a button face.
pub fn button_style<T: Theme + ?Sized>(theme: &T, options: ButtonRenderOptions) -> Style {
    if !options.enabled {
        return theme.text_muted_style();
    }
    let ThemeRoles {
        accent_primary,
        accent_secondary,
        error,
        selection_bg,
        background,
        ..
    } = *theme.roles();
    let style = match options.button_type {
        ButtonType::Primary => Style::default().bg(accent_primary).fg(background).add_modifier(Modifier::BOLD),
        ButtonType::Secondary => Style::default().fg(accent_secondary),
        ButtonType::Danger => Style::default().fg(error).add_modifier(Modifier::BOLD),
    };
    if options.focused && options.button_type != ButtonType::Primary {
        style.bg(selection_bg)
    } else if options.focused {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

/// Renders a standard button.
pub fn render_button<T: Theme + ?Sized>(frame: &mut Frame, area: Rect, label: &str, theme: &T, options: ButtonRenderOptions) {
    let border_style = if options.enabled {
        theme.border_style(options.focused)
    } else {
        theme.text_muted_style()
    };
    let padding = if options.borders.is_empty() {
        Padding::horizontal(1)
    } else {
        Padding::ZERO
    };

    frame.render_widget(
        Paragraph::new(label)
            .centered()
            .block(
                Block::bordered()
                    .borders(options.borders)
                    .border_style(border_style)
                    .padding(padding),
            )
            .style(button_style(theme, options)),
        area,
    );
}

/// Builds `key description` hint pairs for the hints bar.
pub fn build_hint_spans<'a, T: Theme + ?Sized>(theme: &T, hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(*key, theme.accent_emphasis_style()));
        spans.push(Span::styled(*description, theme.text_muted_style()));
    }
    spans
}
