use std::path::Path;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::engine::config::EngineConfig;

pub const DEFAULT_CONFIG_FILE: &str = "huffzip.toml";
pub const DEFAULT_LOG_FILTER: &str = "huffzip=info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_filter: String,
    pub engine: EngineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `config_path` if given (it must exist), else `huffzip.toml` from
    /// the working directory when present, else defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        match config_path {
            Some(path) => {
                if !Path::new(path).exists() {
                    bail!("config file not found: {}", path);
                }
                Self::from_file(path)
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, config_path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }
}
