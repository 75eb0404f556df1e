//! The overlay controller for one checkout page.
//!
//! `CheckoutSession` owns the page document and every piece of overlay state:
//! visibility and anchors, focus traps, the unsaved-changes guard and the
//! pending submission. All operations are synchronous. Work that has to leave
//! the controller (running a payment, abandoning one) is returned as
//! [`Effect`]s inside an [`Outcome`], and the runtime reports the result back
//! through [`CheckoutSession::settle_payment`].
//!
//! Public operations never fail. A transition that cannot be carried out
//! because the page lacks an element is logged and leaves every state as it
//! was.

use checkout_types::{Effect, OverlayId, PaymentError, PaymentRequest, Product, Receipt, SubmissionTicket, Visibility};
use indexmap::IndexMap;
use tracing::{debug, error, info, warn};

use crate::dirty_guard::DirtyGuard;
use crate::document::{Document, ElementId, ElementKind};
use crate::error::{DocumentError, OverlayError};
use crate::focus_trap::TrapRegistry;
use crate::keys::Key;
use crate::overlay::OverlayStates;
use crate::page::{BuyDialog, CheckoutPage, PROCESSING_LABEL, PageAction, PageBuilder};
use crate::router::{GlobalTrigger, RouteAction, route};
use crate::submission::SubmissionState;

/// A visibility change performed by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub overlay: OverlayId,
    pub visibility: Visibility,
}

/// Everything an operation changed that a caller might act on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub transitions: Vec<Transition>,
    pub effects: Vec<Effect>,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty() && self.effects.is_empty()
    }

    pub fn opened(&self, overlay: OverlayId) -> bool {
        self.transitions
            .iter()
            .any(|transition| transition.overlay == overlay && transition.visibility == Visibility::Open)
    }

    pub fn closed(&self, overlay: OverlayId) -> bool {
        self.transitions
            .iter()
            .any(|transition| transition.overlay == overlay && transition.visibility == Visibility::Closed)
    }

    fn push_transition(&mut self, overlay: OverlayId, visibility: Visibility) {
        self.transitions.push(Transition { overlay, visibility });
    }

    fn merge(&mut self, other: Outcome) {
        self.transitions.extend(other.transitions);
        self.effects.extend(other.effects);
    }
}

/// Edit applied to a focused text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Insert(char),
    Backspace,
    Replace(String),
}

#[derive(Debug)]
pub struct CheckoutSession {
    document: Document,
    page: CheckoutPage,
    overlays: OverlayStates,
    traps: TrapRegistry,
    dirty: DirtyGuard,
    submission: SubmissionState,
    product: Option<Product>,
    last_card: usize,
    /// Where focus lands in `buy` once the overlay covering it closes.
    pending_focus: Option<ElementId>,
}

impl CheckoutSession {
    /// Builds the full page for `catalog`.
    pub fn new(catalog: &[Product]) -> Result<Self, DocumentError> {
        Self::with_page(CheckoutPage::builder(catalog))
    }

    /// Builds the page from a customised builder.
    pub fn with_page(builder: PageBuilder<'_>) -> Result<Self, DocumentError> {
        let mut document = Document::new();
        let page = builder.build(&mut document)?;
        Ok(Self {
            document,
            page,
            overlays: OverlayStates::new(),
            traps: TrapRegistry::new(),
            dirty: DirtyGuard::new(),
            submission: SubmissionState::new(),
            product: None,
            last_card: 0,
            pending_focus: None,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct access to the page, for callers that restructure it.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn page(&self) -> &CheckoutPage {
        &self.page
    }

    pub fn overlays(&self) -> &OverlayStates {
        &self.overlays
    }

    pub fn is_open(&self, overlay: OverlayId) -> bool {
        self.overlays.is_open(overlay)
    }

    pub fn anchor(&self, overlay: OverlayId) -> Option<ElementId> {
        self.overlays.get(overlay).anchor()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    pub fn pending_submission(&self) -> Option<SubmissionTicket> {
        self.submission.pending()
    }

    /// The product the `buy` dialog was last opened for.
    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn traps(&self) -> &TrapRegistry {
        &self.traps
    }

    /// Opens `buy` for the product card at `card`.
    pub fn open_buy(&mut self, card: usize) -> Outcome {
        let result = self.try_open_buy(card);
        self.finish("open_buy", result)
    }

    /// Opens `overlay`. `buy` reopens for the most recently selected card.
    pub fn open(&mut self, overlay: OverlayId) -> Outcome {
        if overlay == OverlayId::Buy {
            return self.open_buy(self.last_card);
        }
        let result = self.try_open_nested(overlay);
        self.finish("open", result)
    }

    /// Normal close; a dirty `buy` asks for confirmation instead of closing.
    pub fn close(&mut self, overlay: OverlayId) -> Outcome {
        let result = self.try_close(overlay);
        self.finish("close", result)
    }

    /// Closes `overlay` without consulting the dirty guard.
    pub fn force_close(&mut self, overlay: OverlayId) -> Outcome {
        let result = self.try_force_close(overlay);
        self.finish("force_close", result)
    }

    /// Confirms the discard: closes the confirmation and force-closes `buy`.
    pub fn discard_changes(&mut self) -> Outcome {
        if !self.overlays.is_open(OverlayId::Confirm) {
            return Outcome::default();
        }
        let result = self.try_discard();
        self.finish("discard_changes", result)
    }

    /// Dismisses the confirmation and returns to the still-dirty form.
    pub fn keep_editing(&mut self) -> Outcome {
        if !self.overlays.is_open(OverlayId::Confirm) {
            return Outcome::default();
        }
        let mut outcome = Outcome::default();
        self.hide(OverlayId::Confirm, &mut outcome);
        if let Some(first) = self.page.first_field() {
            self.restore_focus(OverlayId::Confirm, first);
        }
        debug!("Kept editing the checkout form");
        outcome
    }

    /// Records an input-change event on the checkout form.
    pub fn input_changed(&mut self) {
        if self.dirty.mark_dirty() {
            debug!("Checkout form has unsaved changes");
        }
    }

    pub fn escape(&mut self) -> Outcome {
        self.trigger(GlobalTrigger::Escape)
    }

    /// A pointer-down on `overlay`'s backdrop, outside its content.
    pub fn backdrop_click(&mut self, overlay: OverlayId) -> Outcome {
        self.trigger(GlobalTrigger::BackdropClick(overlay))
    }

    fn trigger(&mut self, trigger: GlobalTrigger) -> Outcome {
        match route(&self.overlays, trigger) {
            RouteAction::KeepEditing => self.keep_editing(),
            RouteAction::Close(overlay) => self.close(overlay),
            RouteAction::Swallow => {
                debug!(?trigger, "Trigger swallowed by a covering overlay");
                Outcome::default()
            }
            RouteAction::Ignore => Outcome::default(),
        }
    }

    /// Feeds one key press through traps, the global router and the
    /// focused control.
    pub fn handle_key(&mut self, key: Key) -> Outcome {
        match key {
            Key::Escape => self.escape(),
            Key::Tab | Key::BackTab => {
                self.navigate(key == Key::BackTab);
                Outcome::default()
            }
            Key::Enter | Key::Space => match self.document.active_element() {
                Some(active) => self.press(active, key),
                None => Outcome::default(),
            },
            Key::Char(ch) => self.edit_active(FieldEdit::Insert(ch)),
            Key::Backspace => self.edit_active(FieldEdit::Backspace),
            Key::Other => Outcome::default(),
        }
    }

    fn navigate(&mut self, reverse: bool) {
        let key = if reverse { Key::BackTab } else { Key::Tab };
        if self.traps.dispatch(&mut self.document, key).is_handled() {
            return;
        }
        if self.document.active_element().is_none()
            && let Some(target) = self.topmost_trap_boundary(reverse)
            && self.document.focus(target).is_ok()
        {
            return;
        }
        self.document.focus_next(reverse);
    }

    fn topmost_trap_boundary(&self, reverse: bool) -> Option<ElementId> {
        let surface = self.overlays.topmost().and_then(|overlay| self.page.surface(overlay))?;
        let trap = self.traps.get(surface.backdrop)?;
        if reverse { trap.last(&self.document) } else { trap.first(&self.document) }
    }

    fn press(&mut self, element: ElementId, key: Key) -> Outcome {
        let Some(kind) = self.document.get(element).map(|el| el.kind) else {
            return Outcome::default();
        };
        match (kind, key) {
            (ElementKind::Input, Key::Space) => self.edit_active(FieldEdit::Insert(' ')),
            (ElementKind::Input, Key::Enter) | (ElementKind::Checkbox, Key::Enter) if self.in_buy_form(element) => {
                self.submit()
            }
            (ElementKind::Button | ElementKind::Link { .. } | ElementKind::Checkbox, _) => self.activate(element),
            _ => Outcome::default(),
        }
    }

    fn in_buy_form(&self, element: ElementId) -> bool {
        self.page
            .buy
            .as_ref()
            .is_some_and(|dialog| self.document.is_inside(element, dialog.form.form_section))
    }

    /// Activates a control, as a click or Enter/Space would.
    ///
    /// Controls outside the topmost open overlay are inert, as are hidden and
    /// disabled ones.
    pub fn activate(&mut self, element: ElementId) -> Outcome {
        let Some(target) = self.document.get(element) else {
            debug!(%element, "Ignoring activation of a missing element");
            return Outcome::default();
        };
        if target.disabled || !self.document.is_reachable(element) {
            return Outcome::default();
        }
        if let Some(top) = self.overlays.topmost().and_then(|overlay| self.page.surface(overlay))
            && !self.document.is_inside(element, top.backdrop)
        {
            debug!(%element, "Ignoring activation behind the topmost overlay");
            return Outcome::default();
        }
        if self.document.is_focusable(element) {
            let _ = self.document.focus(element);
        }
        match self.page.action_for(element) {
            Some(action) => self.perform(action),
            None => Outcome::default(),
        }
    }

    fn perform(&mut self, action: PageAction) -> Outcome {
        match action {
            PageAction::OpenBuy(card) => self.open_buy(card),
            PageAction::Open(overlay) => self.open(overlay),
            PageAction::Close(overlay) => self.close(overlay),
            PageAction::Discard => self.discard_changes(),
            PageAction::KeepEditing => self.keep_editing(),
            PageAction::Submit => self.submit(),
            PageAction::Toggle(checkbox) => {
                let checked = self.document.get(checkbox).is_some_and(|el| el.checked);
                if self.document.set_checked(checkbox, !checked).is_ok() {
                    self.input_changed();
                }
                Outcome::default()
            }
        }
    }

    /// Applies `edit` to the focused element if it is a checkout form field.
    pub fn edit_active(&mut self, edit: FieldEdit) -> Outcome {
        match self.document.active_element() {
            Some(active) => self.edit_field(active, edit),
            None => Outcome::default(),
        }
    }

    /// Applies `edit` to a text field of the checkout form.
    pub fn edit_field(&mut self, field: ElementId, edit: FieldEdit) -> Outcome {
        let editable = self
            .document
            .get(field)
            .is_some_and(|el| el.kind == ElementKind::Input && !el.disabled)
            && self.document.is_reachable(field)
            && self.in_buy_form(field);
        if !editable {
            return Outcome::default();
        }
        let mut value = self.document.value(field).unwrap_or_default().to_string();
        match edit {
            FieldEdit::Insert(ch) => value.push(ch),
            FieldEdit::Backspace => {
                if value.pop().is_none() {
                    return Outcome::default();
                }
            }
            FieldEdit::Replace(text) => value = text,
        }
        if self.document.set_value(field, value).is_ok() {
            self.input_changed();
        }
        Outcome::default()
    }

    /// Submits the checkout form, requesting a payment.
    pub fn submit(&mut self) -> Outcome {
        let result = self.try_submit();
        self.finish("submit", result)
    }

    /// Applies the result of the payment started with `ticket`. Stale
    /// tickets are ignored.
    pub fn settle_payment(&mut self, ticket: SubmissionTicket, result: Result<Receipt, PaymentError>) -> Outcome {
        if !self.submission.settle(ticket) {
            debug!(%ticket, "Ignoring settlement of a stale submission");
            return Outcome::default();
        }
        let outcome = match result {
            Ok(receipt) => self.apply_success(ticket, receipt),
            Err(failure) => self.apply_failure(ticket, failure),
        };
        self.finish("settle_payment", outcome)
    }

    fn try_open_buy(&mut self, card: usize) -> Result<Outcome, OverlayError> {
        let dialog = self.buy_dialog()?;
        let product_card = self.page.cards.get(card).cloned().ok_or(OverlayError::MissingElement {
            overlay: OverlayId::Buy,
            control: "product card",
        })?;
        let name = self
            .document
            .text(product_card.name)
            .ok_or(DocumentError::NotFound(product_card.name))?
            .to_string();
        let price = self
            .document
            .text(product_card.price)
            .ok_or(DocumentError::NotFound(product_card.price))?
            .to_string();
        self.require(OverlayId::Buy, "summary", dialog.form.summary)?;
        self.require(OverlayId::Buy, "pay button", dialog.form.pay)?;

        let mut outcome = Outcome::default();
        if let Some(ticket) = self.submission.cancel() {
            outcome.effects.push(Effect::CancelSubmission(ticket));
        }
        self.reset_form(&dialog, &name, &price);
        self.dirty.clear();
        self.pending_focus = None;
        self.last_card = card;
        self.product = Some(Product::new(name.clone(), price.clone()));

        let anchor = self.document.active_element();
        if self.overlays.get_mut(OverlayId::Buy).mark_open(anchor) {
            outcome.push_transition(OverlayId::Buy, Visibility::Open);
        }
        self.document.set_hidden(dialog.surface.backdrop, false)?;
        if let Some(first) = self.page.initial_focus(OverlayId::Buy) {
            self.restore_focus(OverlayId::Buy, first);
        }
        self.traps.engage(&self.document, dialog.surface.backdrop);
        info!(product = %name, %price, "Opened checkout");
        Ok(outcome)
    }

    fn try_open_nested(&mut self, overlay: OverlayId) -> Result<Outcome, OverlayError> {
        if let Some(parent) = overlay.parent()
            && !self.overlays.is_open(parent)
        {
            return Err(OverlayError::ParentClosed { overlay, parent });
        }
        let surface = self.page.surface(overlay).ok_or(OverlayError::MissingSurface(overlay))?;
        self.require(overlay, "backdrop", surface.backdrop)?;

        let mut outcome = Outcome::default();
        // Only wcag returns focus to its trigger; tos and confirm hand focus
        // to fixed controls inside buy.
        let anchor = match overlay {
            OverlayId::Wcag => self.document.active_element(),
            _ => None,
        };
        if self.overlays.get_mut(overlay).mark_open(anchor) {
            outcome.push_transition(overlay, Visibility::Open);
        }
        self.document.set_hidden(surface.backdrop, false)?;
        if let Some(target) = self.page.initial_focus(overlay) {
            self.restore_focus(overlay, target);
        }
        self.traps.engage(&self.document, surface.backdrop);
        debug!(%overlay, "Opened overlay");
        Ok(outcome)
    }

    fn try_close(&mut self, overlay: OverlayId) -> Result<Outcome, OverlayError> {
        if !self.overlays.is_open(overlay) {
            return Ok(Outcome::default());
        }
        match overlay {
            OverlayId::Buy if self.dirty.is_dirty() => {
                if self.confirm_available() {
                    return self.try_open_nested(OverlayId::Confirm);
                }
                error!("Discard confirmation is missing; closing checkout without it");
                self.try_force_close(OverlayId::Buy)
            }
            OverlayId::Confirm => Ok(self.keep_editing()),
            _ => self.try_force_close(overlay),
        }
    }

    fn confirm_available(&self) -> bool {
        self.page
            .confirm
            .as_ref()
            .is_some_and(|dialog| self.document.contains(dialog.surface.backdrop))
    }

    fn try_force_close(&mut self, overlay: OverlayId) -> Result<Outcome, OverlayError> {
        if !self.overlays.is_open(overlay) {
            return Ok(Outcome::default());
        }
        let mut outcome = Outcome::default();
        if overlay == OverlayId::Buy {
            for child in overlay.children() {
                if self.overlays.is_open(*child) {
                    self.hide(*child, &mut outcome);
                }
            }
            if let Some(ticket) = self.submission.cancel() {
                info!(%ticket, "Cancelled pending payment");
                outcome.effects.push(Effect::CancelSubmission(ticket));
                if let Some(dialog) = self.page.buy.clone() {
                    self.restore_pay_button(&dialog);
                }
            }
            self.dirty.clear();
            self.pending_focus = None;
        }

        let anchor = self.hide(overlay, &mut outcome);
        match overlay {
            OverlayId::Buy | OverlayId::Wcag => {
                if let Some(anchor) = anchor {
                    self.restore_focus(overlay, anchor);
                }
            }
            OverlayId::Tos => {
                let link = self.page.buy.as_ref().map(|dialog| dialog.form.tos_link);
                if let Some(link) = link.filter(|link| self.document.is_reachable(*link)) {
                    self.restore_focus(overlay, link);
                }
            }
            OverlayId::Confirm => {
                if let Some(first) = self.page.first_field() {
                    self.restore_focus(overlay, first);
                }
            }
        }
        if overlay != OverlayId::Buy
            && self.overlays.topmost() == Some(OverlayId::Buy)
            && let Some(target) = self.pending_focus.take()
        {
            self.restore_focus(OverlayId::Buy, target);
        }
        debug!(%overlay, "Closed overlay");
        Ok(outcome)
    }

    fn try_discard(&mut self) -> Result<Outcome, OverlayError> {
        let mut outcome = Outcome::default();
        self.hide(OverlayId::Confirm, &mut outcome);
        outcome.merge(self.try_force_close(OverlayId::Buy)?);
        info!("Discarded checkout changes");
        Ok(outcome)
    }

    fn try_submit(&mut self) -> Result<Outcome, OverlayError> {
        let dialog = self.buy_dialog()?;
        if self.overlays.topmost() != Some(OverlayId::Buy) {
            debug!("Ignoring submit while checkout is covered or closed");
            return Ok(Outcome::default());
        }
        if !self.document.is_reachable(dialog.form.form_section) {
            return Ok(Outcome::default());
        }
        self.require(OverlayId::Buy, "pay button", dialog.form.pay)?;
        let product = self.product.clone().ok_or(OverlayError::MissingElement {
            overlay: OverlayId::Buy,
            control: "order summary",
        })?;
        let Some(ticket) = self.submission.begin() else {
            debug!("Payment already in progress");
            return Ok(Outcome::default());
        };

        let mut fields = IndexMap::new();
        for field in &dialog.form.fields {
            if let Some(element) = self.document.get(*field)
                && let Some(name) = &element.name
            {
                fields.insert(name.clone(), element.value.clone());
            }
        }
        if let Some(terms) = self.document.get(dialog.form.terms)
            && let Some(name) = &terms.name
        {
            fields.insert(name.clone(), terms.checked.to_string());
        }

        self.document.set_text(dialog.form.pay, PROCESSING_LABEL)?;
        self.document.set_disabled(dialog.form.pay, true)?;
        if self.document.contains(dialog.form.error_section) {
            self.document.set_hidden(dialog.form.error_section, true)?;
        }
        info!(%ticket, product = %product.name, "Submitting payment");
        Ok(Outcome {
            transitions: Vec::new(),
            effects: vec![Effect::SubmitPayment {
                ticket,
                request: PaymentRequest { product, fields },
            }],
        })
    }

    fn apply_success(&mut self, ticket: SubmissionTicket, receipt: Receipt) -> Result<Outcome, OverlayError> {
        let dialog = self.buy_dialog()?;
        self.restore_pay_button(&dialog);
        self.document.set_hidden(dialog.form.form_section, true)?;
        self.document.set_text(
            dialog.form.success_message,
            format!(
                "Thank you! Order {} for {} is confirmed.",
                receipt.reference, receipt.product.name
            ),
        )?;
        self.document.set_hidden(dialog.form.success_section, false)?;
        self.dirty.clear();

        // Nothing is left to discard once the order went through.
        let mut outcome = Outcome::default();
        if self.overlays.is_open(OverlayId::Confirm) {
            self.hide(OverlayId::Confirm, &mut outcome);
        }
        if let Some(close) = dialog.surface.close_control {
            self.focus_in_buy(close);
        }
        info!(%ticket, reference = %receipt.reference, "Payment settled");
        Ok(outcome)
    }

    fn apply_failure(&mut self, ticket: SubmissionTicket, failure: PaymentError) -> Result<Outcome, OverlayError> {
        let dialog = self.buy_dialog()?;
        self.restore_pay_button(&dialog);
        self.document.set_text(dialog.form.error_message, failure.to_string())?;
        self.document.set_hidden(dialog.form.error_section, false)?;
        self.focus_in_buy(dialog.form.pay);
        warn!(%ticket, error = %failure, "Payment failed");
        Ok(Outcome::default())
    }

    fn reset_form(&mut self, dialog: &BuyDialog, name: &str, price: &str) {
        let form = &dialog.form;
        let doc = &mut self.document;
        let _ = doc.set_text(form.summary, format!("{name} - {price}"));
        for field in &form.fields {
            let _ = doc.set_value(*field, "");
        }
        let _ = doc.set_checked(form.terms, false);
        let _ = doc.set_hidden(form.form_section, false);
        let _ = doc.set_hidden(form.error_section, true);
        let _ = doc.set_text(form.error_message, "");
        let _ = doc.set_hidden(form.success_section, true);
        let _ = doc.set_text(form.success_message, "");
        let _ = doc.set_text(form.pay, pay_label(price));
        let _ = doc.set_disabled(form.pay, false);
    }

    fn restore_pay_button(&mut self, dialog: &BuyDialog) {
        let price = self.product.as_ref().map(|product| product.price.clone()).unwrap_or_default();
        let _ = self.document.set_text(dialog.form.pay, pay_label(&price));
        let _ = self.document.set_disabled(dialog.form.pay, false);
    }

    /// Hides the overlay's surface and marks it closed, returning its anchor.
    fn hide(&mut self, overlay: OverlayId, outcome: &mut Outcome) -> Option<ElementId> {
        if let Some(surface) = self.page.surface(overlay)
            && let Err(error) = self.document.set_hidden(surface.backdrop, true)
        {
            warn!(%overlay, %error, "Overlay surface vanished while open");
        }
        let anchor = self.overlays.get_mut(overlay).mark_closed();
        outcome.push_transition(overlay, Visibility::Closed);
        anchor
    }

    /// Focuses `target` now when `buy` is on top, otherwise once the overlay
    /// covering it closes.
    fn focus_in_buy(&mut self, target: ElementId) {
        if self.overlays.topmost() == Some(OverlayId::Buy) {
            self.pending_focus = None;
            self.restore_focus(OverlayId::Buy, target);
        } else {
            self.pending_focus = Some(target);
        }
    }

    fn restore_focus(&mut self, overlay: OverlayId, target: ElementId) {
        if self.document.focus(target).is_err() {
            let error = OverlayError::StaleFocus(target);
            debug!(%overlay, %error, "Skipped focus restoration");
        }
    }

    fn buy_dialog(&self) -> Result<BuyDialog, OverlayError> {
        self.page.buy.clone().ok_or(OverlayError::MissingSurface(OverlayId::Buy))
    }

    fn require(&self, overlay: OverlayId, control: &'static str, element: ElementId) -> Result<(), OverlayError> {
        if self.document.contains(element) {
            Ok(())
        } else {
            Err(OverlayError::MissingElement { overlay, control })
        }
    }

    fn finish(&self, operation: &'static str, result: Result<Outcome, OverlayError>) -> Outcome {
        match result {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(operation, %error, "Overlay operation skipped");
                Outcome::default()
            }
        }
    }
}

fn pay_label(price: &str) -> String {
    if price.is_empty() { "Pay".to_string() } else { format!("Pay {price}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> CheckoutSession {
        CheckoutSession::new(&[Product::new("Widget", "$10"), Product::new("Gadget", "$20")]).expect("session")
    }

    fn buy(session: &CheckoutSession) -> BuyDialog {
        session.page().buy.clone().expect("buy dialog")
    }

    #[test]
    fn open_buy_populates_summary_and_focuses_first_field() {
        let mut session = session();
        let outcome = session.open_buy(1);
        assert!(outcome.opened(OverlayId::Buy));
        let dialog = buy(&session);
        assert_eq!(session.document().text(dialog.form.summary), Some("Gadget - $20"));
        assert_eq!(session.document().text(dialog.form.pay), Some("Pay $20"));
        assert_eq!(session.document().active_element(), Some(dialog.form.fields[0]));
        assert!(session.traps().get(dialog.surface.backdrop).is_some());
    }

    #[test]
    fn typing_marks_form_dirty() {
        let mut session = session();
        session.open_buy(0);
        assert!(!session.is_dirty());
        session.handle_key(Key::Char('A'));
        session.handle_key(Key::Space);
        session.handle_key(Key::Char('B'));
        session.handle_key(Key::Backspace);
        let dialog = buy(&session);
        assert_eq!(session.document().value(dialog.form.fields[0]), Some("A "));
        assert!(session.is_dirty());
    }

    #[test]
    fn nested_overlays_require_buy() {
        let mut session = session();
        assert!(session.open(OverlayId::Tos).is_empty());
        assert!(session.open(OverlayId::Confirm).is_empty());
        assert!(!session.is_open(OverlayId::Tos));
        assert!(session.open(OverlayId::Wcag).opened(OverlayId::Wcag));
    }

    #[test]
    fn space_toggles_terms_and_enter_submits() {
        let mut session = session();
        session.open_buy(0);
        let dialog = buy(&session);
        session.document_mut().focus(dialog.form.terms).expect("focus terms");
        session.handle_key(Key::Space);
        assert!(session.document().get(dialog.form.terms).is_some_and(|el| el.checked));
        assert!(session.is_dirty());
        let outcome = session.handle_key(Key::Enter);
        assert!(matches!(outcome.effects.as_slice(), [Effect::SubmitPayment { .. }]));
    }

    #[test]
    fn activation_behind_topmost_overlay_is_inert() {
        let mut session = session();
        session.open_buy(0);
        let other_card = session.page().cards[1].buy_button;
        assert!(session.activate(other_card).is_empty());
        assert_eq!(session.product().map(|p| p.name.as_str()), Some("Widget"));
    }
}
