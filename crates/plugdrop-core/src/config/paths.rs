//! Config path resolution helpers.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "plugdrop.toml";
pub const SETTINGS_FILE_NAME: &str = "settings.toml";
pub const LOG_FILE_NAME: &str = "plugdrop.log";

pub fn default_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("plugdrop"))
        .ok_or_else(|| Error::Config("Could not determine config directory".into()))
}

/// Directory for logs and other runtime state.
pub fn default_state_dir() -> Result<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("plugdrop"))
        .ok_or_else(|| Error::Config("Could not determine state directory".into()))
}

pub fn config_file_in(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

pub fn settings_file_in(config_dir: &Path) -> PathBuf {
    config_dir.join(SETTINGS_FILE_NAME)
}
