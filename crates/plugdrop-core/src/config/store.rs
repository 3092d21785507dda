//! Config store for loading and saving plugdrop.toml.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs::write_atomic;

use super::{PlugdropConfig, parser, paths};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Store rooted at the platform config directory.
    pub fn from_default_dir() -> Result<Self> {
        let dir = paths::default_config_dir()?;
        Ok(Self::from_path(paths::config_file_in(&dir)))
    }

    pub fn from_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Directory the config file lives in; default store files sit next to it.
    pub fn config_dir(&self) -> &Path {
        self.config_path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Load the config, falling back to defaults when the file is absent.
    pub fn load(&self) -> Result<PlugdropConfig> {
        if !self.config_path.exists() {
            return Ok(PlugdropConfig::new());
        }
        parser::parse_config(&self.config_path)
    }

    pub fn save(&self, config: &PlugdropConfig) -> Result<()> {
        let content = parser::to_toml(config)?;
        write_atomic(&self.config_path, content.as_bytes()).map_err(|e| {
            Error::from_io(
                format!("Failed to write config file: {}", self.config_path.display()),
                &self.config_path,
                e,
            )
        })
    }
}
