//! UI components: storefront, checkout dialog, info dialogs, discard prompt.

pub mod buy_dialog;
pub mod catalog;
pub mod component;
pub mod confirm_dialog;
pub mod controls;
pub mod info_dialog;

pub use buy_dialog::BuyDialogComponent;
pub use catalog::CatalogComponent;
pub(crate) use component::Component;
pub use confirm_dialog::ConfirmDialogComponent;
pub use info_dialog::InfoDialogComponent;
