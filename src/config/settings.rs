//! User settings and preferences
//!
//! Manages application settings stored in ~/.brandscout/config.toml

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides `scraper.api_key`
pub const API_KEY_ENV: &str = "SCRAPER_API_KEY";

/// Environment variable that overrides `model.base_url`
pub const OLLAMA_URL_ENV: &str = "OLLAMA_BASE_URL";

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub scraper: ScraperSettings,

    #[serde(default)]
    pub model: ModelSettings,
}

/// Scraping proxy and marketplace settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperSettings {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_marketplace_url")]
    pub marketplace_url: String,

    #[serde(default = "default_true")]
    pub render: bool,

    #[serde(default = "default_scrape_timeout")]
    pub timeout_secs: u64,

    /// Marker prefixed to scraped prices and checked during verification
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_model_name")]
    pub name: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://api.scraperapi.com".to_string()
}

fn default_marketplace_url() -> String {
    "https://www.amazon.in/s".to_string()
}

fn default_true() -> bool {
    true
}

fn default_scrape_timeout() -> u64 {
    60
}

fn default_currency() -> String {
    "\u{20b9}".to_string()
}

fn default_model_name() -> String {
    "llama3".to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model_timeout() -> u64 {
    120
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            marketplace_url: default_marketplace_url(),
            render: default_true(),
            timeout_secs: default_scrape_timeout(),
            currency: default_currency(),
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            base_url: default_base_url(),
            timeout_secs: default_model_timeout(),
        }
    }
}

impl ScraperSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ModelSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Get the config directory path (~/.brandscout/)
    pub fn config_dir() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".brandscout"))
    }

    /// Default settings file path
    pub fn settings_file() -> ConfigResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides on top of file values
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.scraper.api_key = Some(key);
        }
        if let Some(url) = lookup(OLLAMA_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.model.base_url = url;
        }
    }
}

/// Load settings from an explicit path, or ~/.brandscout/config.toml.
///
/// A missing default file yields defaults; a missing explicit file is an error.
/// Environment overrides are applied in both cases.
pub fn load_settings(path: Option<&Path>) -> ConfigResult<Settings> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (Settings::settings_file()?, false),
    };

    let mut settings = if path.exists() {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ConfigError::NotFound(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Settings::from_toml(&content)?
    } else if explicit {
        return Err(ConfigError::NotFound(path.display().to_string()));
    } else {
        Settings::default()
    };

    settings.apply_env(|name| std::env::var(name).ok());
    Ok(settings)
}
