//! `plugdrop.toml` schema.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlugdropConfig {
    pub catalog: CatalogConfig,
    pub store: StoreConfig,
    pub target: TargetProfile,
}

impl PlugdropConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory holding one subdirectory per manifest.
    pub dir: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./manifests"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Settings file backing the key/value store. Defaults to
    /// `settings.toml` next to `plugdrop.toml`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// `auto` means the registry on Windows unless a settings file path
    /// is given, and the settings file everywhere else.
    pub fn resolved_backend(&self) -> StoreBackend {
        match self.backend {
            StoreBackend::Auto if cfg!(windows) && self.path.is_none() => StoreBackend::Registry,
            StoreBackend::Auto => StoreBackend::File,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Auto,
    /// TOML settings file.
    File,
    /// `HKEY_CURRENT_USER`, one subkey per namespace. Windows only.
    Registry,
}

/// Names identifying the target application: where its install location
/// is recorded, which flags make up the toggle record, and the layout of
/// its install tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProfile {
    pub install_namespace: String,
    pub install_value: String,
    pub toggle_namespace: String,
    /// Written with the toggle value.
    pub mirrored_flags: [String; 2],
    /// Always written as `false`.
    pub forced_off_flags: [String; 2],
    /// Relative to the install path.
    pub shim_file: PathBuf,
    /// Relative to the install path.
    pub plugin_dir: PathBuf,
    pub executable: String,
    pub process_names: Vec<String>,
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self {
            install_namespace: "Software/Vendor/App".to_string(),
            install_value: "InstallPath".to_string(),
            toggle_namespace: "Software/Vendor/App/Behavior".to_string(),
            mirrored_flags: [
                "BehaviorEnabled".to_string(),
                "BehaviorPersistent".to_string(),
            ],
            forced_off_flags: ["FloatingVisible".to_string(), "SkipDepotSync".to_string()],
            shim_file: PathBuf::from("runtime.shim"),
            plugin_dir: Path::new("config").join("stplug-in"),
            executable: "app".to_string(),
            process_names: vec!["app".to_string(), "app-helper".to_string()],
        }
    }
}

impl TargetProfile {
    pub fn shim_path(&self, install: &Path) -> PathBuf {
        install.join(&self.shim_file)
    }

    pub fn plugin_dir_path(&self, install: &Path) -> PathBuf {
        install.join(&self.plugin_dir)
    }

    /// The executable inside `install`. Bare names get the platform
    /// executable suffix.
    pub fn executable_path(&self, install: &Path) -> PathBuf {
        install.join(with_exe_suffix(&self.executable))
    }
}

pub(crate) fn with_exe_suffix(name: &str) -> String {
    if Path::new(name).extension().is_some() || std::env::consts::EXE_SUFFIX.is_empty() {
        name.to_string()
    } else {
        format!("{name}{}", std::env::consts::EXE_SUFFIX)
    }
}
