use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::categorize::InterfaceOrder;

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Default interface ordering when no `--order` is given.
    #[serde(default)]
    pub order: InterfaceOrder,
    /// Template glob used by `render` when `--templates` is omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_glob: Option<String>,
}

impl Config {
    /// Reads the config file, or returns defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parses config text without touching the filesystem.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Writes the config file, creating its directory if needed.
    pub fn save(&self) -> Result<()> {
        let path = config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

/// `<config dir>/uci-wireless/config.toml`
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?;
    Ok(config_dir.join("uci-wireless").join("config.toml"))
}
