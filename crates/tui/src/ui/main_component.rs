use checkout_engine::PRIORITY_ORDER;
use checkout_types::{Effect, Msg, OverlayId};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Block, Paragraph},
};

use super::components::{BuyDialogComponent, CatalogComponent, Component, ConfirmDialogComponent, InfoDialogComponent};
use super::hit_map::Hit;
use super::input::{is_quit_chord, to_key};
use crate::app::App;

/// Root view: the storefront plus whichever dialogs are open, stacked in
/// priority order.
#[derive(Debug)]
pub struct MainView {
    catalog: CatalogComponent,
    buy: BuyDialogComponent,
    tos: InfoDialogComponent,
    wcag: InfoDialogComponent,
    confirm: ConfirmDialogComponent,
}

impl Default for MainView {
    fn default() -> Self {
        Self {
            catalog: CatalogComponent,
            buy: BuyDialogComponent,
            tos: InfoDialogComponent::new(OverlayId::Tos),
            wcag: InfoDialogComponent::new(OverlayId::Wcag),
            confirm: ConfirmDialogComponent,
        }
    }
}

impl MainView {
    fn overlay_area(&self, overlay: OverlayId, screen: Rect) -> Rect {
        match overlay {
            OverlayId::Buy => self.buy.area(screen),
            OverlayId::Tos => self.tos.area(screen),
            OverlayId::Wcag => self.wcag.area(screen),
            OverlayId::Confirm => self.confirm.area(screen),
        }
    }

    fn overlay_view(&mut self, overlay: OverlayId) -> &mut dyn Component {
        match overlay {
            OverlayId::Buy => &mut self.buy,
            OverlayId::Tos => &mut self.tos,
            OverlayId::Wcag => &mut self.wcag,
            OverlayId::Confirm => &mut self.confirm,
        }
    }

    fn top_view(&self, app: &App) -> &dyn Component {
        match app.session.overlays().topmost() {
            Some(OverlayId::Buy) => &self.buy,
            Some(OverlayId::Tos) => &self.tos,
            Some(OverlayId::Wcag) => &self.wcag,
            Some(OverlayId::Confirm) => &self.confirm,
            None => &self.catalog,
        }
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        app.update(&msg)
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }
        if is_quit_chord(&key) {
            return vec![Effect::Quit];
        }
        if key.code == KeyCode::Char('q') && !app.session.overlays().any_open() {
            return vec![Effect::Quit];
        }
        let outcome = app.session.handle_key(to_key(key));
        app.apply(outcome)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(mouse.column, mouse.row);
        let outcome = match app.hits.resolve(position, app.session.overlays().topmost()) {
            Hit::Control(element) => app.session.activate(element),
            Hit::Backdrop(overlay) => app.session.backdrop_click(overlay),
            Hit::Inside(_) | Hit::Page => return Vec::new(),
        };
        app.apply(outcome)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        app.hits.clear();
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let [page_area, hints_area] = self.get_preferred_layout(app, area)[..] else {
            return;
        };
        self.catalog.render(frame, page_area, app);

        for overlay in PRIORITY_ORDER.into_iter().rev() {
            if !app.session.is_open(overlay) {
                continue;
            }
            render_overlay(frame, app);
            let dialog_area = self.overlay_area(overlay, page_area);
            self.overlay_view(overlay).render(frame, dialog_area, app);
        }

        let hint_spans = self.get_hint_spans(app);
        let hints_widget = Paragraph::new(Line::from(hint_spans)).style(app.ctx.theme.text_muted_style());
        frame.render_widget(hints_widget, hints_area);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];
        hint_spans.extend(self.top_view(app).get_hint_spans(app));
        hint_spans.push(Span::styled(" Ctrl+C", app.ctx.theme.accent_emphasis_style()));
        hint_spans.push(Span::styled(" Quit", app.ctx.theme.text_muted_style()));
        hint_spans
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Min(1),    // Page and dialogs
            Constraint::Length(1), // Hints bar
        ])
        .split(area)
        .to_vec()
    }
}

/// Dims everything drawn so far so the next dialog stands out.
fn render_overlay(frame: &mut Frame, app: &mut App) {
    frame.render_widget(Block::default().style(app.ctx.theme.modal_background_style()).dim(), frame.area());
}
