use std::time::Duration;

use checkout_engine::{CheckoutSession, FieldEdit, Key, PaymentGateway, SimulatedGateway};
use checkout_types::{Effect, OverlayId, PaymentError, Product};
use checkout_util::PaymentOutcome;

fn catalog() -> Vec<Product> {
    vec![Product::new("Widget", "$10"), Product::new("Gadget Pro", "$49")]
}

fn session() -> CheckoutSession {
    CheckoutSession::new(&catalog()).expect("session")
}

/// Opens buy from the first card the way a user would: focus the card's
/// button, then activate it.
fn open_from_card(session: &mut CheckoutSession, card: usize) {
    let button = session.page().cards[card].buy_button;
    session.document_mut().focus(button).expect("focus buy button");
    let outcome = session.activate(button);
    assert!(outcome.opened(OverlayId::Buy));
}

fn type_text(session: &mut CheckoutSession, text: &str) {
    for ch in text.chars() {
        session.handle_key(Key::Char(ch));
    }
}

#[test]
fn buy_dialog_shows_selected_product_and_traps_tab() {
    let mut session = session();
    open_from_card(&mut session, 0);
    let buy = session.page().buy.clone().expect("buy");

    assert_eq!(session.document().text(buy.form.summary), Some("Widget - $10"));
    assert_eq!(session.document().active_element(), Some(buy.form.fields[0]));

    session.document_mut().focus(buy.form.pay).expect("focus pay");
    session.handle_key(Key::Tab);
    assert_eq!(session.document().active_element(), buy.surface.close_control);

    session.handle_key(Key::BackTab);
    assert_eq!(session.document().active_element(), Some(buy.form.pay));
}

#[test]
fn tab_walks_every_control_without_leaving_buy() {
    let mut session = session();
    open_from_card(&mut session, 1);
    let backdrop = session.page().buy.as_ref().expect("buy").surface.backdrop;
    for _ in 0..25 {
        session.handle_key(Key::Tab);
        let active = session.document().active_element().expect("focus stays set");
        assert!(session.document().is_inside(active, backdrop));
    }
}

#[test]
fn tab_without_focus_enters_topmost_overlay() {
    let mut session = session();
    open_from_card(&mut session, 0);
    let buy = session.page().buy.clone().expect("buy");
    session.document_mut().blur();
    session.handle_key(Key::Tab);
    assert_eq!(session.document().active_element(), buy.surface.close_control);
    session.document_mut().blur();
    session.handle_key(Key::BackTab);
    assert_eq!(session.document().active_element(), Some(buy.form.pay));
}

#[test]
fn wcag_round_trip_from_footer_restores_focus() {
    let mut session = session();
    let link = session.page().footer_wcag_link;
    session.document_mut().focus(link).expect("focus footer link");

    let outcome = session.activate(link);
    assert!(outcome.opened(OverlayId::Wcag));
    let wcag = session.page().wcag.clone().expect("wcag");
    assert_eq!(session.document().active_element(), wcag.surface.close_control);

    let outcome = session.handle_key(Key::Escape);
    assert!(outcome.closed(OverlayId::Wcag));
    assert_eq!(session.document().active_element(), Some(link));
    assert!(!session.overlays().any_open());
}

#[test]
fn escape_unwinds_overlays_in_priority_order() {
    let mut session = session();
    open_from_card(&mut session, 0);
    let buy = session.page().buy.clone().expect("buy");
    type_text(&mut session, "Ada");
    assert!(session.is_dirty());

    session.activate(buy.form.tos_link);
    assert!(session.is_open(OverlayId::Tos));

    let outcome = session.handle_key(Key::Escape);
    assert!(outcome.closed(OverlayId::Tos));
    assert!(session.is_open(OverlayId::Buy));
    assert_eq!(session.document().active_element(), Some(buy.form.tos_link));

    let outcome = session.handle_key(Key::Escape);
    assert!(outcome.opened(OverlayId::Confirm));
    assert!(session.is_open(OverlayId::Buy));

    let outcome = session.handle_key(Key::Escape);
    assert!(outcome.closed(OverlayId::Confirm));
    assert!(session.is_open(OverlayId::Buy));
    assert!(session.is_dirty());
    assert_eq!(session.document().active_element(), Some(buy.form.fields[0]));
    assert_eq!(session.document().value(buy.form.fields[0]), Some("Ada"));
}

#[test]
fn buy_backdrop_is_swallowed_while_confirm_is_open() {
    let mut session = session();
    open_from_card(&mut session, 0);
    type_text(&mut session, "x");
    session.backdrop_click(OverlayId::Buy);
    assert!(session.is_open(OverlayId::Confirm));

    let outcome = session.backdrop_click(OverlayId::Buy);
    assert!(outcome.is_empty());
    assert!(session.is_open(OverlayId::Confirm));
    assert!(session.is_open(OverlayId::Buy));

    let outcome = session.backdrop_click(OverlayId::Confirm);
    assert!(outcome.closed(OverlayId::Confirm));
    assert!(session.is_open(OverlayId::Buy));
}

#[test]
fn clean_buy_closes_without_confirmation() {
    let mut session = session();
    open_from_card(&mut session, 1);
    let card = session.page().cards[1].buy_button;
    let outcome = session.backdrop_click(OverlayId::Buy);
    assert!(outcome.closed(OverlayId::Buy));
    assert!(!outcome.opened(OverlayId::Confirm));
    assert_eq!(session.document().active_element(), Some(card));
}

#[test]
fn discard_closes_everything_and_resets_the_form() {
    let mut session = session();
    open_from_card(&mut session, 0);
    let buy = session.page().buy.clone().expect("buy");
    let confirm = session.page().confirm.clone().expect("confirm");
    let card = session.page().cards[0].buy_button;
    type_text(&mut session, "Ada");
    session.activate(buy.form.cancel);
    assert!(session.is_open(OverlayId::Confirm));
    assert_eq!(session.document().active_element(), Some(confirm.discard));

    let outcome = session.handle_key(Key::Enter);
    assert!(outcome.closed(OverlayId::Confirm));
    assert!(outcome.closed(OverlayId::Buy));
    assert!(!session.overlays().any_open());
    assert!(!session.is_dirty());
    assert_eq!(session.document().active_element(), Some(card));

    open_from_card(&mut session, 0);
    assert_eq!(session.document().value(buy.form.fields[0]), Some(""));
    assert!(!session.is_dirty());
}

#[test]
fn keep_editing_button_returns_to_form() {
    let mut session = session();
    open_from_card(&mut session, 0);
    let buy = session.page().buy.clone().expect("buy");
    let confirm = session.page().confirm.clone().expect("confirm");
    session.edit_field(buy.form.fields[1], FieldEdit::Replace("ada@example.com".into()));
    session.close(OverlayId::Buy);

    session.activate(confirm.keep_editing);
    assert!(!session.is_open(OverlayId::Confirm));
    assert!(session.is_open(OverlayId::Buy));
    assert_eq!(session.document().active_element(), Some(buy.form.fields[0]));
    assert_eq!(session.document().value(buy.form.fields[1]), Some("ada@example.com"));
}

#[test]
fn stale_anchor_is_skipped_silently() {
    let mut session = session();
    open_from_card(&mut session, 0);
    let card = session.page().cards[0].card;
    session.document_mut().remove(card).expect("remove card");

    let outcome = session.handle_key(Key::Escape);
    assert!(outcome.closed(OverlayId::Buy));
    assert_eq!(session.document().active_element(), None);
}

#[test]
fn wcag_and_buy_keep_separate_anchors() {
    let mut session = session();
    open_from_card(&mut session, 0);
    let buy = session.page().buy.clone().expect("buy");
    let card = session.page().cards[0].buy_button;

    session.document_mut().focus(buy.form.wcag_link).expect("focus wcag link");
    session.handle_key(Key::Enter);
    assert!(session.is_open(OverlayId::Wcag));
    assert_eq!(session.anchor(OverlayId::Buy), Some(card));
    assert_eq!(session.anchor(OverlayId::Wcag), Some(buy.form.wcag_link));

    session.handle_key(Key::Escape);
    assert_eq!(session.document().active_element(), Some(buy.form.wcag_link));
    assert!(session.is_open(OverlayId::Buy));

    session.handle_key(Key::Escape);
    assert_eq!(session.document().active_element(), Some(card));
}

#[test]
fn force_closing_buy_closes_its_nested_overlays() {
    let mut session = session();
    open_from_card(&mut session, 0);
    let tos_link = session.page().buy.as_ref().expect("buy").form.tos_link;
    session.activate(tos_link);
    assert!(session.is_open(OverlayId::Tos));

    let outcome = session.force_close(OverlayId::Buy);
    assert!(outcome.closed(OverlayId::Tos));
    assert!(outcome.closed(OverlayId::Buy));
    assert!(!session.overlays().any_open());
}

#[test]
fn missing_confirm_dialog_falls_back_to_closing() {
    let mut session =
        CheckoutSession::with_page(checkout_engine::CheckoutPage::builder(&catalog()).omit(OverlayId::Confirm))
            .expect("session");
    open_from_card(&mut session, 0);
    type_text(&mut session, "Ada");
    let outcome = session.handle_key(Key::Escape);
    assert!(outcome.closed(OverlayId::Buy));
    assert!(!session.is_dirty());
}

#[test]
fn missing_tos_dialog_is_a_no_op() {
    let mut session =
        CheckoutSession::with_page(checkout_engine::CheckoutPage::builder(&catalog()).omit(OverlayId::Tos))
            .expect("session");
    open_from_card(&mut session, 0);
    let tos_link = session.page().buy.as_ref().expect("buy").form.tos_link;
    let outcome = session.activate(tos_link);
    assert!(outcome.is_empty());
    assert!(!session.is_open(OverlayId::Tos));
    assert!(session.is_open(OverlayId::Buy));
}

#[tokio::test(start_paused = true)]
async fn successful_submission_shows_confirmation() {
    let mut session = session();
    open_from_card(&mut session, 0);
    let buy = session.page().buy.clone().expect("buy");
    type_text(&mut session, "Ada");

    session.document_mut().focus(buy.form.pay).expect("focus pay");
    let outcome = session.handle_key(Key::Enter);
    let [Effect::SubmitPayment { ticket, request }] = outcome.effects.as_slice() else {
        panic!("expected a payment request, got {:?}", outcome.effects);
    };
    assert_eq!(request.product.name, "Widget");
    assert_eq!(request.fields.get("name").map(String::as_str), Some("Ada"));
    assert_eq!(session.document().text(buy.form.pay), Some("Processing..."));
    assert!(session.document().get(buy.form.pay).is_some_and(|el| el.disabled));
    assert!(session.submit().is_empty(), "second submit while pending");

    let gateway = SimulatedGateway::new(Duration::from_millis(1500), PaymentOutcome::Succeed, "declined");
    let result = gateway.submit(request.clone()).await;
    session.settle_payment(*ticket, result);

    assert!(!session.document().is_reachable(buy.form.form_section));
    assert!(session.document().is_reachable(buy.form.success_message));
    let message = session.document().text(buy.form.success_message).unwrap_or_default();
    assert!(message.contains("ORD-000001"), "{message}");
    assert!(!session.is_dirty());
    assert_eq!(session.document().active_element(), buy.surface.close_control);

    let outcome = session.handle_key(Key::Escape);
    assert!(outcome.closed(OverlayId::Buy));

    open_from_card(&mut session, 0);
    assert!(!session.document().is_reachable(buy.form.success_section));
    assert!(session.document().is_reachable(buy.form.form_section));
    for field in &buy.form.fields {
        assert_eq!(session.document().value(*field), Some(""));
    }
    assert_eq!(session.document().text(buy.form.pay), Some("Pay $10"));
    assert!(session.document().is_focusable(buy.form.pay));
    assert_eq!(session.document().active_element(), Some(buy.form.fields[0]));
}

#[tokio::test(start_paused = true)]
async fn settling_under_the_discard_prompt_closes_it() {
    let mut session = session();
    open_from_card(&mut session, 0);
    let buy = session.page().buy.clone().expect("buy");
    type_text(&mut session, "A");

    let outcome = session.submit();
    let [Effect::SubmitPayment { ticket, request }] = outcome.effects.as_slice() else {
        panic!("expected a payment request");
    };
    assert!(session.handle_key(Key::Escape).opened(OverlayId::Confirm));

    let gateway = SimulatedGateway::new(Duration::from_millis(1500), PaymentOutcome::Succeed, "declined");
    let result = gateway.submit(request.clone()).await;
    let outcome = session.settle_payment(*ticket, result);

    assert!(outcome.closed(OverlayId::Confirm));
    assert!(!session.is_open(OverlayId::Confirm));
    assert!(!session.is_dirty());
    assert!(session.document().is_reachable(buy.form.success_message));
    assert_eq!(session.document().active_element(), buy.surface.close_control);

    let outcome = session.handle_key(Key::Escape);
    assert!(outcome.closed(OverlayId::Buy));
}

#[tokio::test(start_paused = true)]
async fn settling_under_terms_defers_focus_until_terms_close() {
    let mut session = session();
    open_from_card(&mut session, 0);
    let buy = session.page().buy.clone().expect("buy");

    let outcome = session.submit();
    let [Effect::SubmitPayment { ticket, request }] = outcome.effects.as_slice() else {
        panic!("expected a payment request");
    };
    assert!(session.activate(buy.form.tos_link).opened(OverlayId::Tos));
    let tos = session.page().surface(OverlayId::Tos).expect("tos");

    let gateway = SimulatedGateway::new(Duration::from_millis(1500), PaymentOutcome::Succeed, "declined");
    let result = gateway.submit(request.clone()).await;
    session.settle_payment(*ticket, result);

    assert!(session.is_open(OverlayId::Tos));
    let active = session.document().active_element().expect("focus stays in terms");
    assert!(session.document().is_inside(active, tos.backdrop));

    let outcome = session.handle_key(Key::Escape);
    assert!(outcome.closed(OverlayId::Tos));
    assert!(session.is_open(OverlayId::Buy));
    assert_eq!(session.document().active_element(), buy.surface.close_control);
}

#[tokio::test(start_paused = true)]
async fn failed_submission_keeps_form_data() {
    let mut session = session();
    open_from_card(&mut session, 1);
    let buy = session.page().buy.clone().expect("buy");
    type_text(&mut session, "Ada");

    let outcome = session.submit();
    let [Effect::SubmitPayment { ticket, request }] = outcome.effects.as_slice() else {
        panic!("expected a payment request");
    };
    let gateway = SimulatedGateway::new(Duration::from_millis(20), PaymentOutcome::Fail, "Card declined");
    let result = gateway.submit(request.clone()).await;
    session.settle_payment(*ticket, result);

    assert!(session.document().is_reachable(buy.form.error_message));
    assert_eq!(
        session.document().text(buy.form.error_message),
        Some("payment declined: Card declined")
    );
    assert_eq!(session.document().value(buy.form.fields[0]), Some("Ada"));
    assert_eq!(session.document().text(buy.form.pay), Some("Pay $49"));
    assert!(session.document().is_focusable(buy.form.pay));
    assert_eq!(session.document().active_element(), Some(buy.form.pay));
    assert!(session.is_dirty());
    assert!(session.is_open(OverlayId::Buy));
}

#[test]
fn closing_buy_cancels_the_pending_payment() {
    let mut session = session();
    open_from_card(&mut session, 0);
    let buy = session.page().buy.clone().expect("buy");
    let outcome = session.submit();
    let [Effect::SubmitPayment { ticket, .. }] = outcome.effects.as_slice() else {
        panic!("expected a payment request");
    };
    let ticket = *ticket;

    let outcome = session.force_close(OverlayId::Buy);
    assert!(outcome.effects.contains(&Effect::CancelSubmission(ticket)));
    assert_eq!(session.pending_submission(), None);

    let outcome = session.settle_payment(ticket, Err(PaymentError::Unavailable("late".into())));
    assert!(outcome.is_empty());
    assert!(!session.document().is_reachable(buy.form.error_message));

    open_from_card(&mut session, 0);
    assert_eq!(session.document().text(buy.form.pay), Some("Pay $10"));
    assert!(session.document().is_reachable(buy.form.form_section));
}
