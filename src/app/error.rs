use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum DownchartsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Timed out after {secs}s waiting for element with class '{selector}'")]
    Timeout { selector: String, secs: u64 },

    #[error("Element not found: {0}")]
    NotFound(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DownchartsError>;

/// Failure to build a single track record. Recovered by skipping the track.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("no element with class '{0}' in track")]
    MissingLocator(String),

    #[error("no text matching '{0}' in track")]
    MissingText(String),
}
