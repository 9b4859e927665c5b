use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::todo::Priority;
use crate::utils::paths::get_config_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the saved state, ~/.todo-projects/data when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// chrono format used when displaying due dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_priority")]
    pub default_priority: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_date_format() -> String {
    "%B %d, %Y".to_string()
}

fn default_priority() -> String {
    Priority::default().to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: default_log_level(),
            date_format: default_date_format(),
            default_priority: default_priority(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", config_path.display()))?;

        Ok(config)
    }

    /// Write this config to ~/.todo-projects/config.toml, replacing any existing file
    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(())
    }

    pub fn default_priority(&self) -> Priority {
        Priority::from(self.default_priority.as_str())
    }
}
