//! Optional credentials file

use crate::error::{Result, SweepError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Consumer credentials read from `~/.config/followsweep/config.json`.
/// The file is only ever read; tokens are never written to it.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UserConfig {
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
}

impl UserConfig {
    /// Get the config file path (~/.config/followsweep/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("followsweep").join("config.json"))
    }

    /// Load config from the default location, or an empty config if there is none
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            SweepError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            SweepError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }
}
