//! Theme preference store.
//!
//! Owns the current [`ThemePreference`] and the palette applied to the root
//! of every frame. Changes take effect in place: the next frame is drawn
//! with the new palette, nothing is restarted.

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{Palette, SystemPreference, ThemePreference};
use crate::config::AppConfig;

/// Durable slot holding the raw theme string
pub trait PreferenceSlot {
    fn read(&self) -> Option<String>;
    fn write(&mut self, value: &str) -> Result<()>;
}

/// The `theme` key of a config file
#[derive(Debug, Clone)]
pub struct ConfigSlot {
    path: PathBuf,
}

impl ConfigSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot in the default config file, if a config directory exists
    pub fn default_location() -> Option<Self> {
        AppConfig::config_path().ok().map(Self::new)
    }
}

impl PreferenceSlot for ConfigSlot {
    fn read(&self) -> Option<String> {
        AppConfig::load_from(&self.path).theme
    }

    /// Rewrite only the `theme` key. A file that is not valid TOML is
    /// left untouched and reported as an error.
    fn write(&mut self, value: &str) -> Result<()> {
        let mut table = if self.path.exists() {
            std::fs::read_to_string(&self.path)?
                .parse::<toml::Table>()
                .with_context(|| format!("{} is not valid TOML", self.path.display()))?
        } else {
            toml::Table::new()
        };
        table.insert("theme".to_string(), toml::Value::String(value.to_string()));

        std::fs::write(&self.path, toml::to_string_pretty(&table)?)?;
        Ok(())
    }
}

/// Session-only slot, used when no config directory is available
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Option<String>,
}

impl MemorySlot {
    #[cfg(test)]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }
}

impl PreferenceSlot for MemorySlot {
    fn read(&self) -> Option<String> {
        self.value.clone()
    }

    fn write(&mut self, value: &str) -> Result<()> {
        self.value = Some(value.to_string());
        Ok(())
    }
}

pub struct ThemeStore {
    current: ThemePreference,
    palette: Palette,
    slot: Box<dyn PreferenceSlot>,
}

impl ThemeStore {
    /// Seed the store from `slot`, falling back to `system`, then dark
    pub fn new(slot: Box<dyn PreferenceSlot>, system: &dyn SystemPreference) -> Self {
        let current = Self::initial(slot.as_ref(), system);
        tracing::debug!("Initial theme: {}", current);
        Self {
            current,
            palette: current.palette(),
            slot,
        }
    }

    /// Store backed by the default config file, or memory if there is none
    pub fn open_default(system: &dyn SystemPreference) -> Self {
        let slot: Box<dyn PreferenceSlot> = match ConfigSlot::default_location() {
            Some(slot) => Box::new(slot),
            None => {
                tracing::warn!("No config directory, theme changes last for this session only");
                Box::new(MemorySlot::default())
            }
        };
        Self::new(slot, system)
    }

    /// Derive the starting theme without building a store
    pub fn initial(slot: &dyn PreferenceSlot, system: &dyn SystemPreference) -> ThemePreference {
        if let Some(raw) = slot.read() {
            match ThemePreference::parse(&raw) {
                Some(pref) => return pref,
                None => tracing::debug!("Ignoring unknown stored theme {:?}", raw),
            }
        }

        system.preference().unwrap_or(ThemePreference::DEFAULT)
    }

    pub fn get(&self) -> ThemePreference {
        self.current
    }

    /// Palette currently applied to the root of the frame
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Change the theme for this session and persist it. A failed write
    /// is logged and otherwise ignored.
    pub fn set(&mut self, value: ThemePreference) {
        self.current = value;
        self.palette = value.palette();

        if let Err(e) = self.slot.write(value.as_str()) {
            tracing::warn!("Could not persist theme preference: {}", e);
        }
    }

    pub fn toggle(&mut self) {
        self.set(self.current.opposite());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFERS_LIGHT: Option<bool> = Some(true);
    const PREFERS_DARK: Option<bool> = Some(false);
    const NO_HINT: Option<bool> = None;

    fn store_with(slot: MemorySlot, system: Option<bool>) -> ThemeStore {
        ThemeStore::new(Box::new(slot), &system)
    }

    #[test]
    fn test_initial_without_stored_value() {
        let empty = MemorySlot::default();
        assert_eq!(ThemeStore::initial(&empty, &PREFERS_LIGHT), ThemePreference::Light);
        assert_eq!(ThemeStore::initial(&empty, &PREFERS_DARK), ThemePreference::Dark);
        assert_eq!(ThemeStore::initial(&empty, &NO_HINT), ThemePreference::Dark);
    }

    #[test]
    fn test_stored_value_beats_system_hint() {
        let slot = MemorySlot::with_value("dark");
        assert_eq!(ThemeStore::initial(&slot, &PREFERS_LIGHT), ThemePreference::Dark);
    }

    #[test]
    fn test_unknown_stored_value_is_ignored() {
        let slot = MemorySlot::with_value("blue");
        assert_eq!(ThemeStore::initial(&slot, &PREFERS_LIGHT), ThemePreference::Light);
        assert_eq!(ThemeStore::initial(&slot, &NO_HINT), ThemePreference::Dark);
    }

    #[test]
    fn test_set_updates_memory_palette_and_slot() {
        let mut store = store_with(MemorySlot::default(), NO_HINT);
        assert_eq!(store.get(), ThemePreference::Dark);

        store.set(ThemePreference::Light);
        assert_eq!(store.get(), ThemePreference::Light);
        assert_eq!(store.palette(), &Palette::light());
        assert_eq!(store.slot.read().as_deref(), Some("light"));
    }

    #[test]
    fn test_toggle_twice_restores_theme() {
        let mut store = store_with(MemorySlot::with_value("light"), NO_HINT);
        store.toggle();
        assert_eq!(store.get(), ThemePreference::Dark);
        assert_eq!(store.slot.read().as_deref(), Some("dark"));
        store.toggle();
        assert_eq!(store.get(), ThemePreference::Light);
        assert_eq!(store.slot.read().as_deref(), Some("light"));
    }

    #[test]
    fn test_set_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        for pref in [ThemePreference::Light, ThemePreference::Dark] {
            let mut store = ThemeStore::new(Box::new(ConfigSlot::new(&path)), &NO_HINT);
            store.set(pref);

            let reopened = ConfigSlot::new(&path);
            assert_eq!(ThemeStore::initial(&reopened, &PREFERS_LIGHT), pref);
        }
    }

    #[test]
    fn test_config_slot_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = AppConfig {
            user_id: Some("user-9".to_string()),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let mut slot = ConfigSlot::new(&path);
        slot.write("light").unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.theme.as_deref(), Some("light"));
        assert_eq!(loaded.user_id.as_deref(), Some("user-9"));
    }

    #[test]
    fn test_config_slot_keeps_keys_of_mistyped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "theme = 5\nuser_id = \"user-9\"\napi_token = \"secret\"\n",
        )
        .unwrap();

        // A bad theme value alone is not a reason to start from defaults
        let mut slot = ConfigSlot::new(&path);
        assert_eq!(slot.read(), None);
        slot.write("light").unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.theme.as_deref(), Some("light"));
        assert_eq!(loaded.user_id.as_deref(), Some("user-9"));
        assert_eq!(loaded.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_config_slot_leaves_broken_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let broken = "user_id = \"user-9\"\napi_token = [unterminated\n";
        std::fs::write(&path, broken).unwrap();

        let mut store = ThemeStore::new(Box::new(ConfigSlot::new(&path)), &NO_HINT);
        store.set(ThemePreference::Light);

        assert_eq!(store.get(), ThemePreference::Light);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
        assert!(ConfigSlot::new(&path).write("dark").is_err());
    }

    #[test]
    fn test_unwritable_slot_keeps_session_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("config.toml");

        let mut store = ThemeStore::new(Box::new(ConfigSlot::new(&path)), &NO_HINT);
        store.set(ThemePreference::Light);

        assert_eq!(store.get(), ThemePreference::Light);
        assert_eq!(store.palette(), &Palette::light());
        assert!(!path.exists());
    }
}
