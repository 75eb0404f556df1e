use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::Component;
use super::controls::{self, is_focused};
use crate::app::App;
use crate::ui::theme::theme_helpers::{self as th, ButtonType};
use crate::ui::utils::truncate_to_width;

/// The storefront behind the dialogs: title, product cards and footer.
#[derive(Debug, Default)]
pub struct CatalogComponent;

impl CatalogComponent {
    fn render_cards(&self, frame: &mut Frame, area: Rect, app: &mut App) {
        let cards = app.session.page().cards.clone();
        if cards.is_empty() {
            return;
        }
        let columns = Layout::horizontal(vec![Constraint::Fill(1); cards.len()])
            .spacing(1)
            .split(area);

        for (card, column) in cards.iter().zip(columns.iter()) {
            let focused = is_focused(app, card.buy_button);
            let name_width = usize::from(column.width.saturating_sub(2));
            let name = truncate_to_width(&controls::text_of(app, card.name), name_width);
            let price = controls::text_of(app, card.price);
            let description = card
                .description
                .map(|element| controls::text_of(app, element))
                .unwrap_or_default();

            let theme = &*app.ctx.theme;
            let block = th::block(theme, None, focused);
            let inner = block.inner(*column);
            frame.render_widget(block, *column);

            let [text_area, button_area] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).areas(inner);
            let lines = vec![
                Line::from(Span::styled(name, theme.text_primary_style().add_modifier(Modifier::BOLD))),
                Line::from(Span::styled(price, theme.accent_emphasis_style())),
                Line::default(),
                Line::from(Span::styled(description, theme.text_secondary_style())),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), text_area);
            controls::render_button(frame, button_area, app, card.buy_button, ButtonType::Primary);
        }
    }
}

impl Component for CatalogComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let [title_area, cards_area, footer_area] = self.get_preferred_layout(app, rect)[..] else {
            return;
        };
        let page = app.session.page().clone();

        let title = controls::text_of(app, page.title);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(title, app.ctx.theme.accent_emphasis_style()))).centered(),
            title_area,
        );

        self.render_cards(frame, cards_area, app);

        let note = format!("{}  ", controls::text_of(app, page.footer_note));
        let note_width = controls::text_width(app, page.footer_note).saturating_add(2);
        frame.render_widget(Paragraph::new(note).style(app.ctx.theme.text_muted_style()), footer_area);
        let link_area = Rect {
            x: footer_area.x.saturating_add(note_width),
            width: footer_area.width.saturating_sub(note_width),
            ..footer_area
        };
        controls::render_link(frame, link_area, app, page.footer_wcag_link);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::build_hint_spans(
            &*app.ctx.theme,
            &[("Tab/Shift+Tab", " Move "), ("Enter", " Buy/Open "), ("q", " Quit ")],
        )
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Length(2),  // Title
            Constraint::Max(12),    // Product cards
            Constraint::Length(1),  // Footer
        ])
        .spacing(1)
        .split(area)
        .to_vec()
    }
}
