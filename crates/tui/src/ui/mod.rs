//! Terminal rendering of the checkout page and its dialogs.

pub mod components;
pub mod hit_map;
pub mod input;
pub mod main_component;
pub mod runtime;
pub mod theme;
pub mod utils;
