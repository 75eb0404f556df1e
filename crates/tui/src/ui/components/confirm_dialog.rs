use checkout_types::OverlayId;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Wrap};

use super::Component;
use super::controls;
use crate::app::App;
use crate::ui::theme::theme_helpers::{self as th, ButtonType};
use crate::ui::utils::centered_box;

/// Asks whether unsaved checkout input should be thrown away.
#[derive(Debug, Default)]
pub struct ConfirmDialogComponent;

impl ConfirmDialogComponent {
    pub fn area(&self, screen: Rect) -> Rect {
        centered_box(48, 9, screen)
    }
}

impl Component for ConfirmDialogComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let Some(dialog) = app.session.page().confirm.clone() else {
            return;
        };
        let theme = &*app.ctx.theme;
        let block = th::block(theme, Some("Unsaved changes"), true).border_style(theme.status_error());
        let inner = block.inner(rect);
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);
        app.hits.register_layer(OverlayId::Confirm, rect);

        let [message_rect, _, button_rect, ..] = self.get_preferred_layout(app, inner)[..] else {
            return;
        };

        let message = controls::text_of(app, dialog.message);
        let lines = message.lines().map(|line| Line::from(line.to_string())).collect::<Vec<Line>>();
        frame.render_widget(
            Paragraph::new(lines)
                .style(app.ctx.theme.text_primary_style())
                .wrap(Wrap { trim: false }),
            message_rect,
        );

        let [discard, _, keep_editing] = Layout::horizontal([
            Constraint::Length(12),
            Constraint::Length(2),
            Constraint::Length(16),
        ])
        .areas(button_rect);
        controls::render_button(frame, discard, app, dialog.discard, ButtonType::Danger);
        controls::render_button(frame, keep_editing, app, dialog.keep_editing, ButtonType::Secondary);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::build_hint_spans(
            &*app.ctx.theme,
            &[("Tab/Shift+Tab", " Focus "), ("Enter", " Choose "), ("Esc", " Keep editing ")],
        )
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Min(1),    // Message
            Constraint::Length(1), // Spacer
            Constraint::Length(3), // Buttons
        ])
        .split(area)
        .to_vec()
    }
}
