//! Light/dark theme: the preference value, its color palettes, and the
//! store that persists it.

pub mod store;
pub mod system;

use ratatui::style::{Color, Style};
use std::fmt;

pub use store::ThemeStore;
pub use system::{EnvSystemPreference, SystemPreference};

/// The user's chosen display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemePreference {
    Light,
    Dark,
}

impl ThemePreference {
    /// Used when neither a stored value nor a system hint exists
    pub const DEFAULT: ThemePreference = ThemePreference::Dark;

    /// Parse a persisted value. Anything but exactly "light"/"dark" (after
    /// trimming) is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(ThemePreference::Light),
            "dark" => Some(ThemePreference::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            ThemePreference::Light => Palette::light(),
            ThemePreference::Dark => Palette::dark(),
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colors for one theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,        // Active borders, highlights
    pub accent_bright: Color, // Links, tags
    pub danger: Color,        // Errors, destructive actions
    pub success: Color,
    pub warning: Color,
    pub text: Color,
    pub text_dim: Color,
    pub bg: Color,
    pub bg_selected: Color,
    pub inactive: Color, // Inactive borders
    pub header: Color,
}

impl Palette {
    /// Catppuccin Mocha inspired
    pub fn dark() -> Self {
        Self {
            accent: Color::Rgb(250, 179, 135),
            accent_bright: Color::Rgb(245, 194, 231),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(249, 226, 175),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg: Color::Rgb(30, 30, 46),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(137, 180, 250),
        }
    }

    /// Catppuccin Latte inspired
    pub fn light() -> Self {
        Self {
            accent: Color::Rgb(254, 100, 11),
            accent_bright: Color::Rgb(136, 57, 239),
            danger: Color::Rgb(210, 15, 57),
            success: Color::Rgb(64, 160, 43),
            warning: Color::Rgb(223, 142, 29),
            text: Color::Rgb(76, 79, 105),
            text_dim: Color::Rgb(108, 111, 133),
            bg: Color::Rgb(239, 241, 245),
            bg_selected: Color::Rgb(204, 208, 218),
            inactive: Color::Rgb(156, 160, 176),
            header: Color::Rgb(30, 102, 245),
        }
    }

    /// Style painted over the whole frame before anything else is drawn
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_only_accepts_known_values() {
        assert_eq!(ThemePreference::parse("light"), Some(ThemePreference::Light));
        assert_eq!(ThemePreference::parse(" dark\n"), Some(ThemePreference::Dark));
        assert_eq!(ThemePreference::parse("blue"), None);
        assert_eq!(ThemePreference::parse("Dark"), None);
        assert_eq!(ThemePreference::parse(""), None);
    }

    #[test]
    fn test_opposite_is_involution() {
        for pref in [ThemePreference::Light, ThemePreference::Dark] {
            assert_ne!(pref.opposite(), pref);
            assert_eq!(pref.opposite().opposite(), pref);
            assert_eq!(ThemePreference::parse(pref.as_str()), Some(pref));
        }
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(Palette::light().bg, Palette::dark().bg);
        assert_eq!(ThemePreference::Light.palette(), Palette::light());
    }
}
