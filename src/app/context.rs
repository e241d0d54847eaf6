use std::path::PathBuf;

use crate::app::error::Result;
use crate::config::Config;

pub struct AppContext {
    pub config: Config,
}

impl AppContext {
    /// Load the configuration from `config_path`, or from the default location.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load_from(&path)?,
            None => Config::load()?,
        };

        Ok(Self { config })
    }

    pub fn with_config(config: Config) -> Self {
        Self { config }
    }
}
