//! Configuration management for downcharts.
//!
//! Configuration is read from `~/.config/downcharts/config.toml` unless a path is
//! given explicitly. If the default file doesn't exist, a default configuration
//! with comments is created.
//!
//! Site profiles are validated as soon as the file is loaded, so a broken profile
//! is reported before any browser is launched.

pub mod settings;
pub mod site;

pub use settings::{BotSettings, BrowserSettings};
pub use site::SiteProfile;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserSettings,
    pub bot: BotSettings,
    pub sites: BTreeMap<String, SiteProfile>,
}

impl Default for Config {
    fn default() -> Self {
        let mut sites = BTreeMap::new();
        sites.insert("djcity".to_string(), SiteProfile::djcity());

        Self {
            browser: BrowserSettings::default(),
            bot: BotSettings::default(),
            sites,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml(&content, path)
    }

    /// Parse and validate configuration text. `path` is only used for error reports.
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every site profile.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, profile) in &self.sites {
            profile.validate(name)?;
        }
        Ok(())
    }

    /// Resolve the profile configured for `site`.
    pub fn site(&self, site: &str) -> Result<&SiteProfile, ConfigError> {
        self.sites
            .get(site)
            .ok_or_else(|| ConfigError::UnknownSite(site.to_string()))
    }

    /// Get the default config file path: `~/.config/downcharts/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("downcharts").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> &'static str {
        r##"# downcharts configuration
#
# Locators:
# - wait_selector, title_locator, artist_locator: a single class name
# - root_selector: an element id
# - everything else: a CSS selector, evaluated relative to its parent element

[browser]
# Run browser in headless mode (no visible window)
headless = true

# How long to wait for the chart page to become ready (seconds)
wait_timeout_secs = 10

[bot]
# Account the bot replies as; its own comments are ignored
username = "TopMusicCharts"

# Matches "!topmusiccharts" and "topmusiccharts!"
trigger = "topmusiccharts"

# provider=all genre=house
action_separator = "="

# Comments handled at once, and comments allowed to wait in the queue
workers = 4
queue_capacity = 32

[sites.djcity]
url = "http://www.djcity.com/charts/"
wait_selector = "charts-list"
root_selector = "charts"
genre_list_query = "[id$=\"-container\"]"
genre_id_attribute = "id"
# "house-container" becomes "house"
genre_id_suffix = "-container"
track_list_query = "li"
title_locator = "title"
title_sub_selector = "a"
artist_locator = "artist"
artist_sub_selector = "span"
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("No site named '{0}' in the configuration file")]
    UnknownSite(String),

    #[error("Site '{site}' has an empty '{field}'")]
    EmptyField { site: String, field: &'static str },

    #[error("Site '{site}' has an invalid url: {source}")]
    InvalidUrl {
        site: String,
        source: url::ParseError,
    },

    #[error("Site '{site}' has an invalid selector in '{field}': {reason}")]
    InvalidSelector {
        site: String,
        field: &'static str,
        reason: String,
    },
}
