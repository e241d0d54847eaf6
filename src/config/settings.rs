use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Browser session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// How long to wait for the chart page to become ready, in seconds (default: 10)
    pub wait_timeout_secs: u64,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            wait_timeout_secs: 10,
            user_agent: None,
        }
    }
}

impl BrowserSettings {
    /// Get the readiness wait timeout as a Duration
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

/// Comment bot settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    /// Account the bot posts as; its own comments are never answered
    pub username: String,

    /// Name inside the trigger marker (`!name` or `name!`)
    pub trigger: String,

    /// Separator between an action's name and value (default: '=')
    pub action_separator: char,

    /// Separator between actions (default: any whitespace)
    pub command_separator: Option<char>,

    /// Maximum comments handled concurrently (default: 4)
    pub workers: usize,

    /// Comments that may wait in the queue before dispatch is refused (default: 32)
    pub queue_capacity: usize,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            username: "TopMusicCharts".to_string(),
            trigger: "topmusiccharts".to_string(),
            action_separator: '=',
            command_separator: None,
            workers: 4,
            queue_capacity: 32,
        }
    }
}
