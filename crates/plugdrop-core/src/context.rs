//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::ManifestCatalog;
use crate::config::{ConfigStore, PlugdropConfig, StoreBackend, paths};
use crate::deploy::Deployer;
use crate::error::Result;
use crate::process::{ProcessControl, RestartController, SystemProcessControl};
use crate::provision::Provisioner;
#[cfg(windows)]
use crate::settings::RegistrySettingsStore;
use crate::settings::{SettingsStore, TargetSettings, TomlSettingsStore};

/// Loaded configuration plus the directories derived from it.
///
/// Frontends (CLI/TUI) create this once and build services from it.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: PlugdropConfig,
    config_path: PathBuf,
    config_dir: PathBuf,
    state_dir: PathBuf,
}

impl AppContext {
    pub fn new(config: PlugdropConfig, config_dir: PathBuf, state_dir: PathBuf) -> Self {
        Self {
            config,
            config_path: paths::config_file_in(&config_dir),
            config_dir,
            state_dir,
        }
    }

    /// Load `plugdrop.toml` from `config_path`, or from the platform
    /// config directory when none is given.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let store = match config_path {
            Some(path) => ConfigStore::from_path(path),
            None => ConfigStore::from_default_dir()?,
        };
        let config = store.load()?;
        let state_dir =
            paths::default_state_dir().unwrap_or_else(|_| store.config_dir().to_path_buf());
        let mut ctx = Self::new(config, store.config_dir().to_path_buf(), state_dir);
        ctx.config_path = store.config_path().to_path_buf();
        Ok(ctx)
    }

    pub fn with_manifests_dir(mut self, dir: PathBuf) -> Self {
        self.config.catalog.dir = dir;
        self
    }

    pub fn config(&self) -> &PlugdropConfig {
        &self.config
    }

    /// The `plugdrop.toml` this context was loaded from (it may not exist).
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::from_path(self.config_path.clone())
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config
            .store
            .path
            .clone()
            .unwrap_or_else(|| paths::settings_file_in(&self.config_dir))
    }

    pub fn catalog(&self) -> ManifestCatalog {
        ManifestCatalog::new(self.config.catalog.dir.clone())
    }

    pub fn settings_backend(&self) -> StoreBackend {
        self.config.store.resolved_backend()
    }

    pub fn settings_store(&self) -> Arc<dyn SettingsStore> {
        match self.settings_backend() {
            #[cfg(windows)]
            StoreBackend::Registry => Arc::new(RegistrySettingsStore::current_user()),
            _ => Arc::new(TomlSettingsStore::new(self.settings_path())),
        }
    }

    pub fn target_settings(&self) -> TargetSettings {
        TargetSettings::new(self.settings_store(), self.config.target.clone())
    }

    pub fn provisioner(&self) -> Provisioner {
        Provisioner::new(self.config.target.clone())
    }

    pub fn deployer(&self) -> Deployer {
        Deployer::new(self.catalog(), self.provisioner())
    }

    pub fn restart_controller(&self) -> RestartController {
        self.restart_controller_with(Arc::new(SystemProcessControl))
    }

    pub fn restart_controller_with(&self, control: Arc<dyn ProcessControl>) -> RestartController {
        RestartController::new(self.target_settings(), control)
    }
}
