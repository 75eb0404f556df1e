//! Theme styling for the storefront.
//!
//! Palettes map onto semantic [`ThemeRoles`]; components style themselves
//! through the [`Theme`] trait and the helpers in [`theme_helpers`] rather
//! than hard-coding colors.

use std::env;

use tracing::{debug, warn};

pub mod dracula;
pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use dracula::DraculaTheme;
pub use nord::NordTheme;
pub use roles::{Theme, ThemeRoles};

/// Environment override that wins over the configured theme.
pub const THEME_ENV: &str = "CHECKOUT_THEME";

pub const DEFAULT_THEME_ID: &str = "dracula";

/// Selectable theme identifiers.
pub const THEME_IDS: &[&str] = &["dracula", "dracula-high-contrast", "nord"];

fn build(id: &str) -> Option<Box<dyn Theme>> {
    match id.to_ascii_lowercase().as_str() {
        "dracula" => Some(Box::new(DraculaTheme::new())),
        "dracula-high-contrast" | "dracula-hc" => Some(Box::new(DraculaTheme::high_contrast())),
        "nord" => Some(Box::new(NordTheme::new())),
        _ => None,
    }
}

/// Picks the theme from `CHECKOUT_THEME`, then `preferred`, then the default.
pub fn load(preferred: Option<&str>) -> Box<dyn Theme> {
    if let Ok(name) = env::var(THEME_ENV)
        && let Some(theme) = build(name.trim())
    {
        debug!(theme = %name, "Theme selected from environment");
        return theme;
    }
    if let Some(name) = preferred {
        if let Some(theme) = build(name.trim()) {
            return theme;
        }
        warn!(theme = %name, "Unknown theme; using {DEFAULT_THEME_ID}");
    }
    Box::new(DraculaTheme::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_theme_builds() {
        for id in THEME_IDS {
            assert!(build(id).is_some(), "{id} should build");
        }
    }

    #[test]
    fn environment_overrides_configured_theme() {
        temp_env::with_var(THEME_ENV, Some("nord"), || {
            let theme = load(Some("dracula"));
            assert_eq!(theme.roles().background, nord::N0);
        });
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        temp_env::with_var_unset(THEME_ENV, || {
            let theme = load(Some("no-such-theme"));
            assert_eq!(theme.roles().background, dracula::BG);
        });
    }
}
