use checkout_engine::BuyDialog;
use checkout_types::OverlayId;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Wrap};

use super::Component;
use super::controls::{self, is_visible};
use crate::app::{App, THROBBER};
use crate::ui::theme::theme_helpers::{self as th, ButtonType};
use crate::ui::utils::centered_box;

/// The checkout dialog: order summary, payment form, and the confirmation
/// shown once payment settles.
#[derive(Debug, Default)]
pub struct BuyDialogComponent;

impl BuyDialogComponent {
    pub fn area(&self, screen: Rect) -> Rect {
        centered_box(64, 22, screen)
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, app: &mut App, dialog: &BuyDialog) {
        let [fields_area, terms_area, fine_print_area, status_area, buttons_area] = Layout::vertical([
            Constraint::Length(9), // Three bordered fields
            Constraint::Length(1), // Terms checkbox + link
            Constraint::Length(1), // Accessibility link
            Constraint::Length(1), // Error / processing line
            Constraint::Length(3), // Buttons
        ])
        .areas(area);

        let field_rows = Layout::vertical(vec![Constraint::Length(3); dialog.form.fields.len()]).split(fields_area);
        for (field, row) in dialog.form.fields.iter().zip(field_rows.iter()) {
            controls::render_text_field(frame, *row, app, *field);
        }

        let checkbox = controls::render_checkbox(frame, terms_area, app, dialog.form.terms);
        let after_checkbox = Rect {
            x: checkbox.right(),
            width: terms_area.width.saturating_sub(checkbox.width),
            ..terms_area
        };
        controls::render_link(frame, after_checkbox, app, dialog.form.tos_link);

        let prompt = "Need help using this form? ";
        let prompt_width = u16::try_from(prompt.len()).unwrap_or(0);
        frame.render_widget(
            Paragraph::new(prompt).style(app.ctx.theme.text_muted_style()),
            fine_print_area,
        );
        let link_area = Rect {
            x: fine_print_area.x.saturating_add(prompt_width),
            width: fine_print_area.width.saturating_sub(prompt_width),
            ..fine_print_area
        };
        controls::render_link(frame, link_area, app, dialog.form.wcag_link);

        if app.is_processing() {
            let frame_glyph = THROBBER[app.throbber_idx % THROBBER.len()];
            let line = Line::from(vec![
                Span::styled(frame_glyph, app.ctx.theme.accent_emphasis_style()),
                Span::styled(" Contacting the payment provider…", app.ctx.theme.text_muted_style()),
            ]);
            frame.render_widget(Paragraph::new(line), status_area);
        } else if is_visible(app, dialog.form.error_message) {
            let message = controls::text_of(app, dialog.form.error_message);
            frame.render_widget(
                Paragraph::new(message).style(app.ctx.theme.status_error()),
                status_area,
            );
        }

        let [cancel_area, _, pay_area] = Layout::horizontal([
            Constraint::Length(12),
            Constraint::Fill(1),
            Constraint::Length(18),
        ])
        .areas(buttons_area);
        controls::render_button(frame, cancel_area, app, dialog.form.cancel, ButtonType::Secondary);
        controls::render_button(frame, pay_area, app, dialog.form.pay, ButtonType::Primary);
    }

    fn render_success(&self, frame: &mut Frame, area: Rect, app: &mut App, dialog: &BuyDialog) {
        let message = controls::text_of(app, dialog.form.success_message);
        let lines = vec![
            Line::default(),
            Line::from(Span::styled(message, app.ctx.theme.status_success())),
            Line::default(),
            Line::from(Span::styled(
                "A receipt is on its way to your inbox.",
                app.ctx.theme.text_secondary_style(),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).centered().wrap(Wrap { trim: true }), area);
    }
}

impl Component for BuyDialogComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let Some(dialog) = app.session.page().buy.clone() else {
            return;
        };
        let theme = &*app.ctx.theme;
        let block = th::block(theme, Some("Checkout"), true);
        let inner = block.inner(rect);
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);
        app.hits.register_layer(OverlayId::Buy, rect);

        if let Some(close) = dialog.surface.close_control {
            let close_area = Rect::new(rect.right().saturating_sub(4), rect.y, 3, 1);
            controls::render_close_control(frame, close_area, app, close);
        }

        let [summary_area, body_area] = self.get_preferred_layout(app, inner)[..] else {
            return;
        };
        let summary = controls::text_of(app, dialog.form.summary);
        frame.render_widget(
            Paragraph::new(Span::styled(summary, app.ctx.theme.accent_emphasis_style())),
            summary_area,
        );

        if is_visible(app, dialog.form.form_section) {
            self.render_form(frame, body_area, app, &dialog);
        } else if is_visible(app, dialog.form.success_section) {
            self.render_success(frame, body_area, app, &dialog);
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::build_hint_spans(
            &*app.ctx.theme,
            &[
                ("Tab/Shift+Tab", " Move "),
                ("Space", " Toggle "),
                ("Enter", " Pay "),
                ("Esc", " Close "),
            ],
        )
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Length(1), // Order summary
            Constraint::Min(1),    // Form or confirmation
        ])
        .spacing(1)
        .split(area)
        .to_vec()
    }
}
