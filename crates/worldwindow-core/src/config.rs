use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use worldwindow_api::{DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_DAILY_LIMIT};

use crate::i18n::Locale;
use crate::toast::DEFAULT_TOAST_DURATION;

/// Main configuration structure
///
/// Loaded from the config file, then overridden by CLI flags and env vars.
/// Every field has a default so an empty or partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load config from the default location, or defaults if there is no file
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| crate::Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Write config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `<config_dir>/worldwindow/config.toml`
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::Config("Could not find config directory".into()))?
            .join("worldwindow");

        Ok(config_dir.join("config.toml"))
    }

    pub fn validate(&self) -> crate::Result<()> {
        let url = self.server.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(crate::Error::Config(format!(
                "server.base_url must be an http(s) URL, got '{}'",
                url
            )));
        }
        if self.feed.daily_limit == 0 {
            return Err(crate::Error::Config("feed.daily_limit must be at least 1".into()));
        }
        if self.feed.batch_size == 0 {
            return Err(crate::Error::Config("feed.batch_size must be at least 1".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.server.timeout_secs.map(Duration::from_secs)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.ui.toast_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Where the card backend lives
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. Unset means none.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedConfig {
    /// Cards fetched by a refresh
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,

    /// Cards fetched per "load more"
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

fn default_daily_limit() -> u32 {
    DEFAULT_DAILY_LIMIT
}

fn default_batch_size() -> u32 {
    DEFAULT_BATCH_SIZE
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            daily_limit: default_daily_limit(),
            batch_size: default_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    /// Language the session starts in. Switching at runtime is not saved.
    #[serde(default)]
    pub locale: Locale,

    /// How long toasts stay up, in milliseconds
    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,
}

fn default_toast_ms() -> u64 {
    DEFAULT_TOAST_DURATION.as_millis() as u64
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            toast_ms: default_toast_ms(),
        }
    }
}
