//! Persistent key/value settings of the target application.
//!
//! Values live in namespaces (one per application identity). The target
//! reads its install location from one namespace and its behavior flags
//! from another; [`TargetSettings`] wraps a backend with those two
//! operations.

pub mod memory;
#[cfg(windows)]
pub mod registry;
pub mod toml_store;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::config::TargetProfile;
use crate::error::{Error, Result};

pub use memory::MemorySettingsStore;
#[cfg(windows)]
pub use registry::RegistrySettingsStore;
pub use toml_store::TomlSettingsStore;

/// Backend for namespaced string settings.
///
/// Writes are independent: there is no batch or transaction, and other
/// processes may write the same backend concurrently.
pub trait SettingsStore: Send + Sync {
    fn read_value(&self, namespace: &str, key: &str) -> Result<String>;

    fn write_value(&self, namespace: &str, key: &str, value: &str) -> Result<()>;
}

pub fn bool_value(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// The target application's view of a [`SettingsStore`].
#[derive(Clone)]
pub struct TargetSettings {
    store: Arc<dyn SettingsStore>,
    profile: TargetProfile,
}

impl std::fmt::Debug for TargetSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetSettings")
            .field("install_namespace", &self.profile.install_namespace)
            .field("toggle_namespace", &self.profile.toggle_namespace)
            .finish_non_exhaustive()
    }
}

impl TargetSettings {
    pub fn new(store: Arc<dyn SettingsStore>, profile: TargetProfile) -> Self {
        Self { store, profile }
    }

    pub fn profile(&self) -> &TargetProfile {
        &self.profile
    }

    pub fn read_install_location(&self) -> Result<PathBuf> {
        let value = self
            .store
            .read_value(&self.profile.install_namespace, &self.profile.install_value)?;
        if value.trim().is_empty() {
            return Err(Error::not_found(format!(
                "setting {}/{}",
                self.profile.install_namespace, self.profile.install_value
            )));
        }
        Ok(PathBuf::from(value))
    }

    /// Write the four flags of the toggle record in order: the mirrored
    /// pair gets `enabled`, the forced-off pair gets `false`.
    ///
    /// Stops at the first failed write; flags written before it keep
    /// their new value.
    pub fn write_toggle(&self, enabled: bool) -> Result<()> {
        let namespace = &self.profile.toggle_namespace;
        let mirrored = self
            .profile
            .mirrored_flags
            .iter()
            .map(|key| (key, bool_value(enabled)));
        let forced_off = self
            .profile
            .forced_off_flags
            .iter()
            .map(|key| (key, bool_value(false)));

        for (key, value) in mirrored.chain(forced_off) {
            debug!(namespace = %namespace, key = %key, value, "writing toggle flag");
            self.store.write_value(namespace, key, value)?;
        }
        Ok(())
    }
}
