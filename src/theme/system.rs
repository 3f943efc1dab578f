//! Host light/dark hint, consulted only when nothing is persisted.

use super::ThemePreference;

/// Explicit override, "light" or "dark"
pub const SCHEME_ENV: &str = "PICATON_COLOR_SCHEME";

/// Set by many terminals (rxvt, konsole, ...) as "fg;bg" or "fg;default;bg"
pub const COLORFGBG_ENV: &str = "COLORFGBG";

pub trait SystemPreference {
    /// `Some(true)` if the host prefers light mode, `None` if it gives no hint
    fn prefers_light(&self) -> Option<bool>;

    fn preference(&self) -> Option<ThemePreference> {
        self.prefers_light().map(|light| {
            if light {
                ThemePreference::Light
            } else {
                ThemePreference::Dark
            }
        })
    }
}

/// Reads the hint from the process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSystemPreference;

impl SystemPreference for EnvSystemPreference {
    fn prefers_light(&self) -> Option<bool> {
        let scheme = std::env::var(SCHEME_ENV).ok();
        let colorfgbg = std::env::var(COLORFGBG_ENV).ok();
        prefers_light_from(scheme.as_deref(), colorfgbg.as_deref())
    }
}

/// Fixed answer
impl SystemPreference for Option<bool> {
    fn prefers_light(&self) -> Option<bool> {
        *self
    }
}

pub fn prefers_light_from(scheme: Option<&str>, colorfgbg: Option<&str>) -> Option<bool> {
    if let Some(pref) = scheme.and_then(ThemePreference::parse) {
        return Some(pref == ThemePreference::Light);
    }

    // Background is the last field; 7 (white) and 15 (bright white) are light
    let bg = colorfgbg?.rsplit(';').next()?.trim();
    match bg.parse::<u8>() {
        Ok(7) | Ok(15) => Some(true),
        Ok(_) => Some(false),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorfgbg_background() {
        assert_eq!(prefers_light_from(None, Some("0;15")), Some(true));
        assert_eq!(prefers_light_from(None, Some("0;default;7")), Some(true));
        assert_eq!(prefers_light_from(None, Some("15;0")), Some(false));
        assert_eq!(prefers_light_from(None, Some("15;default")), None);
        assert_eq!(prefers_light_from(None, None), None);
    }

    #[test]
    fn test_explicit_scheme_wins() {
        assert_eq!(prefers_light_from(Some("dark"), Some("0;15")), Some(false));
        assert_eq!(prefers_light_from(Some("light"), None), Some(true));
        // Unknown override falls through to the terminal hint
        assert_eq!(prefers_light_from(Some("sepia"), Some("0;15")), Some(true));
    }

    #[test]
    fn test_preference_mapping() {
        assert_eq!(Some(true).preference(), Some(ThemePreference::Light));
        assert_eq!(Some(false).preference(), Some(ThemePreference::Dark));
        assert_eq!(None::<bool>.preference(), None);
    }
}
