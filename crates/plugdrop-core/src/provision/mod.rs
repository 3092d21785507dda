//! Prerequisites that must exist in the install tree before any manifest
//! is deployed: the runtime shim file and the plugin directory.

use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::TargetProfile;
use crate::error::{Error, Result};

/// Shim written verbatim to the install root when it is missing.
pub const RUNTIME_SHIM: &[u8] = include_bytes!("../../assets/runtime.shim");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created,
    AlreadyPresent,
}

#[derive(Debug, Clone)]
pub struct Provisioner {
    profile: TargetProfile,
    shim_payload: Cow<'static, [u8]>,
}

impl Provisioner {
    /// Provisioner writing the embedded [`RUNTIME_SHIM`].
    pub fn new(profile: TargetProfile) -> Self {
        Self {
            profile,
            shim_payload: Cow::Borrowed(RUNTIME_SHIM),
        }
    }

    pub fn with_payload(profile: TargetProfile, payload: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            profile,
            shim_payload: payload.into(),
        }
    }

    pub fn profile(&self) -> &TargetProfile {
        &self.profile
    }

    /// Write the shim under `install` unless a file is already there.
    /// An existing shim is never rewritten.
    pub fn ensure_runtime_shim(&self, install: &Path) -> Result<ProvisionOutcome> {
        let shim = self.profile.shim_path(install);
        if exists(&shim, "runtime shim")? {
            debug!(path = %shim.display(), "runtime shim present");
            return Ok(ProvisionOutcome::AlreadyPresent);
        }

        write_shim(&shim, &self.shim_payload).map_err(|e| {
            Error::from_io(
                format!("Failed to create runtime shim {}", shim.display()),
                &shim,
                e,
            )
        })?;
        info!(path = %shim.display(), bytes = self.shim_payload.len(), "runtime shim written");
        Ok(ProvisionOutcome::Created)
    }

    /// Create the plugin directory chain under `install` if it is absent.
    pub fn ensure_plugin_directory(&self, install: &Path) -> Result<ProvisionOutcome> {
        let dir = self.plugin_dir(install);
        if exists(&dir, "plugin directory")? {
            debug!(path = %dir.display(), "plugin directory present");
            return Ok(ProvisionOutcome::AlreadyPresent);
        }

        create_dir_chain(&dir).map_err(|e| {
            Error::from_io(
                format!("Failed to create plugin directory {}", dir.display()),
                &dir,
                e,
            )
        })?;
        info!(path = %dir.display(), "plugin directory created");
        Ok(ProvisionOutcome::Created)
    }

    pub fn plugin_dir(&self, install: &Path) -> PathBuf {
        self.profile.plugin_dir_path(install)
    }
}

/// `Ok(false)` only for "does not exist"; every other stat error is fatal.
fn exists(path: &Path, what: &str) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::from_io(
            format!("Error checking if {what} exists at {}", path.display()),
            path,
            e,
        )),
    }
}

fn write_shim(path: &Path, payload: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let mut file = options.open(path)?;
    file.write_all(payload)?;
    file.sync_all()
}

fn create_dir_chain(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(path)
}
