use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Used when no API URL is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Default HTTP request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Persisted theme preference ("light" or "dark"); kept raw so that an
    /// unknown value survives loading and is ignored by the theme store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Base URL of the Picaton REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Signed-in user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Bearer token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: None,
            api_url: default_api_url(),
            user_id: None,
            api_token: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("picaton");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location, or fall back to defaults
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Ok(path) => Ok(Self::load_from(&path)),
            Err(_) => Ok(AppConfig::default()),
        }
    }

    /// Load config from `path`. Missing or broken files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }
        AppConfig::default()
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Clean up the config before saving
        let mut clean_config = self.clone();
        for field in [
            &mut clean_config.theme,
            &mut clean_config.user_id,
            &mut clean_config.api_token,
        ] {
            if field.as_ref().map(|s| s.trim().is_empty()).unwrap_or(false) {
                *field = None;
            }
        }
        if clean_config.api_url.trim().is_empty() {
            clean_config.api_url = default_api_url();
        }

        let content = toml::to_string_pretty(&clean_config)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
