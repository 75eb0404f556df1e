use checkout_engine::InfoDialog;
use checkout_types::OverlayId;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Clear, Paragraph, Wrap};

use super::Component;
use super::controls;
use crate::app::App;
use crate::ui::theme::theme_helpers::{self as th, ButtonType};
use crate::ui::utils::centered_box;

/// Read-only dialog used for the terms of service and the accessibility
/// statement.
#[derive(Debug)]
pub struct InfoDialogComponent {
    overlay: OverlayId,
}

impl InfoDialogComponent {
    pub fn new(overlay: OverlayId) -> Self {
        Self { overlay }
    }

    pub fn area(&self, screen: Rect) -> Rect {
        centered_box(60, 12, screen)
    }

    fn dialog(&self, app: &App) -> Option<InfoDialog> {
        let page = app.session.page();
        match self.overlay {
            OverlayId::Tos => page.tos.clone(),
            OverlayId::Wcag => page.wcag.clone(),
            _ => None,
        }
    }
}

impl Component for InfoDialogComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let Some(dialog) = self.dialog(app) else {
            return;
        };
        let title = controls::text_of(app, dialog.title);
        let theme = &*app.ctx.theme;
        let block = th::block(theme, Some(title.as_str()), true);
        let inner = block.inner(rect);
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);
        app.hits.register_layer(self.overlay, rect);

        if let Some(close) = dialog.surface.close_control {
            let close_area = Rect::new(rect.right().saturating_sub(4), rect.y, 3, 1);
            controls::render_close_control(frame, close_area, app, close);
        }

        let [body_area, _, button_area] = self.get_preferred_layout(app, inner)[..] else {
            return;
        };
        let body = controls::text_of(app, dialog.body);
        frame.render_widget(
            Paragraph::new(body)
                .style(app.ctx.theme.text_secondary_style())
                .wrap(Wrap { trim: true }),
            body_area,
        );

        let [button, _] = Layout::horizontal([Constraint::Length(12), Constraint::Fill(1)]).areas(button_area);
        controls::render_button(frame, button, app, dialog.close_action, ButtonType::Secondary);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::build_hint_spans(&*app.ctx.theme, &[("Tab/Shift+Tab", " Move "), ("Enter", " Close "), ("Esc", " Back ")])
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Spacer
            Constraint::Length(3), // Close button
        ])
        .split(area)
        .to_vec()
    }
}
