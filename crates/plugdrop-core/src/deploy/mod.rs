//! Manifest deployment into the target's plugin directory.

pub mod verify;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::ManifestCatalog;
use crate::error::Result;
use crate::fs::{CopyStats, copy_tree};
use crate::provision::{ProvisionOutcome, Provisioner};

pub use verify::{Drift, DriftKind, verify_deployment};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub manifest: String,
    pub plugin_dir: PathBuf,
    pub shim: ProvisionOutcome,
    pub plugin_dir_outcome: ProvisionOutcome,
    pub copied: CopyStats,
}

#[derive(Debug, Clone)]
pub struct Deployer {
    catalog: ManifestCatalog,
    provisioner: Provisioner,
}

impl Deployer {
    pub fn new(catalog: ManifestCatalog, provisioner: Provisioner) -> Self {
        Self {
            catalog,
            provisioner,
        }
    }

    pub fn catalog(&self) -> &ManifestCatalog {
        &self.catalog
    }

    pub fn provisioner(&self) -> &Provisioner {
        &self.provisioner
    }

    /// Provision `install`, then copy the manifest tree into its plugin
    /// directory.
    ///
    /// Every file is rewritten on every deploy. A failure part-way leaves
    /// the files copied so far in place.
    pub fn deploy(&self, manifest: &str, install: &Path) -> Result<DeployReport> {
        let shim = self.provisioner.ensure_runtime_shim(install)?;
        let plugin_dir_outcome = self.provisioner.ensure_plugin_directory(install)?;

        let source = self.catalog.manifest_path(manifest)?;
        let plugin_dir = self.provisioner.plugin_dir(install);
        let copied = copy_tree(&source, &plugin_dir)?;

        info!(
            manifest,
            plugin_dir = %plugin_dir.display(),
            files = copied.files_copied,
            dirs = copied.dirs_created,
            "manifest deployed"
        );

        Ok(DeployReport {
            manifest: manifest.to_string(),
            plugin_dir,
            shim,
            plugin_dir_outcome,
            copied,
        })
    }

    /// Compare the manifest's files with what is deployed under `install`.
    pub fn verify(&self, manifest: &str, install: &Path) -> Result<Vec<Drift>> {
        let source = self.catalog.manifest_path(manifest)?;
        verify_deployment(&source, &self.provisioner.plugin_dir(install))
    }
}
