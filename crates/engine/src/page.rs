//! The checkout page as a `Document`: catalog cards, the four dialog
//! surfaces, and the mapping from activated controls to page actions.

use checkout_types::{OverlayId, Product};

use crate::document::{Document, Element, ElementId};
use crate::error::DocumentError;
use crate::overlay::OverlaySurface;

/// Label the pay control shows while a submission is in flight.
pub const PROCESSING_LABEL: &str = "Processing...";

/// A catalog entry with its buy trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub card: ElementId,
    pub name: ElementId,
    pub price: ElementId,
    pub description: Option<ElementId>,
    pub buy_button: ElementId,
}

/// Controls inside the `buy` dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyForm {
    pub summary: ElementId,
    pub form_section: ElementId,
    /// Text inputs in form order; the first one receives focus on open.
    pub fields: Vec<ElementId>,
    pub terms: ElementId,
    pub tos_link: ElementId,
    pub wcag_link: ElementId,
    pub error_section: ElementId,
    pub error_message: ElementId,
    pub cancel: ElementId,
    pub pay: ElementId,
    pub success_section: ElementId,
    pub success_message: ElementId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyDialog {
    pub surface: OverlaySurface,
    pub form: BuyForm,
}

/// `tos` and `wcag` share a layout: a body of text and two close controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoDialog {
    pub surface: OverlaySurface,
    pub title: ElementId,
    pub body: ElementId,
    pub close_action: ElementId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub surface: OverlaySurface,
    pub message: ElementId,
    pub discard: ElementId,
    pub keep_editing: ElementId,
}

/// What activating a control asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// Open `buy` for the product card at this index.
    OpenBuy(usize),
    Open(OverlayId),
    Close(OverlayId),
    Discard,
    KeepEditing,
    Submit,
    Toggle(ElementId),
}

/// Handles to every element the controller works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPage {
    pub title: ElementId,
    pub catalog: ElementId,
    pub cards: Vec<ProductCard>,
    pub footer: ElementId,
    pub footer_note: ElementId,
    pub footer_wcag_link: ElementId,
    pub buy: Option<BuyDialog>,
    pub tos: Option<InfoDialog>,
    pub wcag: Option<InfoDialog>,
    pub confirm: Option<ConfirmDialog>,
}

impl CheckoutPage {
    pub fn builder(catalog: &[Product]) -> PageBuilder<'_> {
        PageBuilder {
            catalog,
            omitted: Vec::new(),
        }
    }

    pub fn surface(&self, overlay: OverlayId) -> Option<OverlaySurface> {
        match overlay {
            OverlayId::Buy => self.buy.as_ref().map(|dialog| dialog.surface),
            OverlayId::Tos => self.tos.as_ref().map(|dialog| dialog.surface),
            OverlayId::Wcag => self.wcag.as_ref().map(|dialog| dialog.surface),
            OverlayId::Confirm => self.confirm.as_ref().map(|dialog| dialog.surface),
        }
    }

    /// Element that receives focus when `overlay` opens.
    pub fn initial_focus(&self, overlay: OverlayId) -> Option<ElementId> {
        match overlay {
            OverlayId::Buy => self.first_field(),
            OverlayId::Tos | OverlayId::Wcag => self.surface(overlay).and_then(|surface| surface.close_control),
            OverlayId::Confirm => self.confirm.as_ref().map(|dialog| dialog.discard),
        }
    }

    pub fn first_field(&self) -> Option<ElementId> {
        self.buy.as_ref().and_then(|dialog| dialog.form.fields.first().copied())
    }

    pub fn action_for(&self, element: ElementId) -> Option<PageAction> {
        if let Some(index) = self.cards.iter().position(|card| card.buy_button == element) {
            return Some(PageAction::OpenBuy(index));
        }
        if element == self.footer_wcag_link {
            return Some(PageAction::Open(OverlayId::Wcag));
        }
        if let Some(dialog) = &self.buy {
            let form = &dialog.form;
            if dialog.surface.close_control == Some(element) || form.cancel == element {
                return Some(PageAction::Close(OverlayId::Buy));
            }
            if form.pay == element {
                return Some(PageAction::Submit);
            }
            if form.terms == element {
                return Some(PageAction::Toggle(element));
            }
            if form.tos_link == element {
                return Some(PageAction::Open(OverlayId::Tos));
            }
            if form.wcag_link == element {
                return Some(PageAction::Open(OverlayId::Wcag));
            }
        }
        for (overlay, dialog) in [(OverlayId::Tos, &self.tos), (OverlayId::Wcag, &self.wcag)] {
            if let Some(dialog) = dialog
                && (dialog.surface.close_control == Some(element) || dialog.close_action == element)
            {
                return Some(PageAction::Close(overlay));
            }
        }
        if let Some(dialog) = &self.confirm {
            if dialog.discard == element {
                return Some(PageAction::Discard);
            }
            if dialog.keep_editing == element {
                return Some(PageAction::KeepEditing);
            }
        }
        None
    }
}

/// Builds the page into a `Document`. Dialogs can be left out to exercise the
/// missing-element paths.
#[derive(Debug)]
pub struct PageBuilder<'a> {
    catalog: &'a [Product],
    omitted: Vec<OverlayId>,
}

impl PageBuilder<'_> {
    pub fn omit(mut self, overlay: OverlayId) -> Self {
        self.omitted.push(overlay);
        self
    }

    fn includes(&self, overlay: OverlayId) -> bool {
        !self.omitted.contains(&overlay)
    }

    pub fn build(self, document: &mut Document) -> Result<CheckoutPage, DocumentError> {
        let root = document.root();
        let title = document.append(root, Element::text("Gadget Shop"))?;
        let catalog = document.append(root, Element::container())?;
        let mut cards = Vec::with_capacity(self.catalog.len());
        for product in self.catalog {
            cards.push(build_card(document, catalog, product)?);
        }

        let footer = document.append(root, Element::container())?;
        let footer_note = document.append(footer, Element::text("All prices include VAT."))?;
        let footer_wcag_link = document.append(footer, Element::link("Accessibility statement"))?;

        let buy = if self.includes(OverlayId::Buy) {
            Some(build_buy(document)?)
        } else {
            None
        };
        let tos = if self.includes(OverlayId::Tos) {
            Some(build_info(document, "Terms of Service", TOS_BODY)?)
        } else {
            None
        };
        let wcag = if self.includes(OverlayId::Wcag) {
            Some(build_info(document, "Accessibility Statement", WCAG_BODY)?)
        } else {
            None
        };
        let confirm = if self.includes(OverlayId::Confirm) {
            Some(build_confirm(document)?)
        } else {
            None
        };

        Ok(CheckoutPage {
            title,
            catalog,
            cards,
            footer,
            footer_note,
            footer_wcag_link,
            buy,
            tos,
            wcag,
            confirm,
        })
    }
}

const TOS_BODY: &str = "Orders are processed once payment clears. Items may be returned within 30 days \
     of delivery in their original condition. Prices are shown in US dollars.";

const WCAG_BODY: &str = "This store aims to conform to WCAG 2.1 level AA. Every dialog can be operated \
     with the keyboard alone: Tab cycles through controls and Esc closes the topmost dialog.";

fn build_card(document: &mut Document, catalog: ElementId, product: &Product) -> Result<ProductCard, DocumentError> {
    let card = document.append(catalog, Element::container())?;
    let name = document.append(card, Element::text(product.name.clone()))?;
    let price = document.append(card, Element::text(product.price.clone()))?;
    let description = match &product.description {
        Some(text) => Some(document.append(card, Element::text(text.clone()))?),
        None => None,
    };
    let buy_button = document.append(card, Element::button("Buy now"))?;
    Ok(ProductCard {
        card,
        name,
        price,
        description,
        buy_button,
    })
}

fn build_surface(document: &mut Document) -> Result<(ElementId, ElementId, ElementId), DocumentError> {
    let root = document.root();
    let backdrop = document.append(root, Element::container().hidden(true))?;
    let content = document.append(backdrop, Element::container())?;
    let close = document.append(content, Element::button("×"))?;
    Ok((backdrop, content, close))
}

fn build_buy(document: &mut Document) -> Result<BuyDialog, DocumentError> {
    let (backdrop, content, close) = build_surface(document)?;
    document.append(content, Element::text("Checkout"))?;
    let summary = document.append(content, Element::text(""))?;

    let form_section = document.append(content, Element::container())?;
    let fields = vec![
        document.append(form_section, Element::input("name", "Full name"))?,
        document.append(form_section, Element::input("email", "Email"))?,
        document.append(form_section, Element::input("card", "Card number"))?,
    ];
    let terms_row = document.append(form_section, Element::container())?;
    let terms = document.append(terms_row, Element::checkbox("terms", "I agree to the"))?;
    let tos_link = document.append(terms_row, Element::link("Terms of Service"))?;
    let fine_print = document.append(form_section, Element::container())?;
    document.append(fine_print, Element::text("Need help using this form?"))?;
    let wcag_link = document.append(fine_print, Element::link("Accessibility"))?;
    let error_section = document.append(form_section, Element::container().hidden(true))?;
    let error_message = document.append(error_section, Element::text(""))?;
    let actions = document.append(form_section, Element::container())?;
    let cancel = document.append(actions, Element::button("Cancel"))?;
    let pay = document.append(actions, Element::button("Pay"))?;

    let success_section = document.append(content, Element::container().hidden(true))?;
    let success_message = document.append(success_section, Element::text(""))?;

    Ok(BuyDialog {
        surface: OverlaySurface {
            backdrop,
            content,
            close_control: Some(close),
        },
        form: BuyForm {
            summary,
            form_section,
            fields,
            terms,
            tos_link,
            wcag_link,
            error_section,
            error_message,
            cancel,
            pay,
            success_section,
            success_message,
        },
    })
}

fn build_info(document: &mut Document, title: &str, body: &str) -> Result<InfoDialog, DocumentError> {
    let (backdrop, content, close) = build_surface(document)?;
    let title = document.append(content, Element::text(title))?;
    let body = document.append(content, Element::text(body))?;
    let close_action = document.append(content, Element::button("Close"))?;
    Ok(InfoDialog {
        surface: OverlaySurface {
            backdrop,
            content,
            close_control: Some(close),
        },
        title,
        body,
        close_action,
    })
}

fn build_confirm(document: &mut Document) -> Result<ConfirmDialog, DocumentError> {
    let root = document.root();
    let backdrop = document.append(root, Element::container().hidden(true))?;
    let content = document.append(backdrop, Element::container())?;
    document.append(content, Element::text("Discard changes?"))?;
    let message = document.append(
        content,
        Element::text("You have unsaved details in the checkout form. Leaving now will lose them."),
    )?;
    let discard = document.append(content, Element::button("Discard"))?;
    let keep_editing = document.append(content, Element::button("Keep editing"))?;
    Ok(ConfirmDialog {
        surface: OverlaySurface {
            backdrop,
            content,
            close_control: None,
        },
        message,
        discard,
        keep_editing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (Document, CheckoutPage) {
        let mut document = Document::new();
        let page = CheckoutPage::builder(&[Product::new("Widget", "$10"), Product::new("Gadget", "$20")])
            .build(&mut document)
            .expect("build page");
        (document, page)
    }

    #[test]
    fn dialogs_start_hidden_and_cards_visible() {
        let (document, page) = page();
        for overlay in OverlayId::ALL {
            let surface = page.surface(overlay).expect("surface");
            assert!(!document.is_reachable(surface.backdrop), "{overlay} should start hidden");
        }
        assert!(document.is_focusable(page.cards[1].buy_button));
        assert_eq!(document.text(page.cards[0].price), Some("$10"));
    }

    #[test]
    fn controls_map_to_actions() {
        let (_, page) = page();
        let buy = page.buy.as_ref().expect("buy");
        assert_eq!(page.action_for(page.cards[1].buy_button), Some(PageAction::OpenBuy(1)));
        assert_eq!(page.action_for(buy.form.cancel), Some(PageAction::Close(OverlayId::Buy)));
        assert_eq!(page.action_for(buy.form.pay), Some(PageAction::Submit));
        assert_eq!(page.action_for(buy.form.tos_link), Some(PageAction::Open(OverlayId::Tos)));
        assert_eq!(page.action_for(page.footer_wcag_link), Some(PageAction::Open(OverlayId::Wcag)));
        let tos = page.tos.as_ref().expect("tos");
        assert_eq!(page.action_for(tos.close_action), Some(PageAction::Close(OverlayId::Tos)));
        let confirm = page.confirm.as_ref().expect("confirm");
        assert_eq!(page.action_for(confirm.keep_editing), Some(PageAction::KeepEditing));
        assert_eq!(page.action_for(buy.form.summary), None);
    }

    #[test]
    fn initial_focus_targets() {
        let (_, page) = page();
        let buy = page.buy.as_ref().expect("buy");
        assert_eq!(page.initial_focus(OverlayId::Buy), Some(buy.form.fields[0]));
        assert_eq!(
            page.initial_focus(OverlayId::Tos),
            page.tos.as_ref().and_then(|dialog| dialog.surface.close_control)
        );
        assert_eq!(
            page.initial_focus(OverlayId::Confirm),
            page.confirm.as_ref().map(|dialog| dialog.discard)
        );
    }

    #[test]
    fn omitted_dialogs_are_absent() {
        let mut document = Document::new();
        let page = CheckoutPage::builder(&[Product::new("Widget", "$10")])
            .omit(OverlayId::Confirm)
            .build(&mut document)
            .expect("build page");
        assert!(page.surface(OverlayId::Confirm).is_none());
        assert!(page.initial_focus(OverlayId::Confirm).is_none());
        assert!(page.surface(OverlayId::Buy).is_some());
    }
}
