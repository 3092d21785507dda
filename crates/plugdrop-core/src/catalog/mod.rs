//! Manifest catalog: one subdirectory per deployable bundle.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    dir: PathBuf,
}

impl ManifestCatalog {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the catalog directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::from_io(
                format!("Failed to create manifest directory: {}", self.dir.display()),
                &self.dir,
                e,
            )
        })
    }

    /// Names of the manifest directories, in directory-listing order.
    ///
    /// A missing or unreadable catalog is an empty catalog.
    pub fn list(&self) -> Vec<String> {
        list_manifests(&self.dir)
    }

    /// Source directory of `name`, or `NotFound` if it is not a manifest.
    pub fn manifest_path(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal {
            return Err(Error::not_found(format!("manifest {name:?}")));
        }
        let path = self.dir.join(name);
        if !path.is_dir() {
            return Err(Error::not_found(format!("manifest {name}")));
        }
        Ok(path)
    }
}

pub fn list_manifests(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "manifest directory unreadable");
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            // Follows symlinks, so a linked manifest directory still counts.
            entry.path().is_dir()
        })
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}
