//! Drift detection between a manifest and its deployed copy.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs::hash_file;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftKind {
    Missing,
    Modified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    /// Relative to the manifest root.
    pub path: PathBuf,
    pub kind: DriftKind,
}

/// Files of `source` that are missing from `deployed` or differ in
/// content. Extra files in `deployed` are not drift: the plugin
/// directory is shared between manifests.
pub fn verify_deployment(source: &Path, deployed: &Path) -> Result<Vec<Drift>> {
    let mut drifts = Vec::new();
    walk(source, Path::new(""), deployed, &mut drifts)?;
    drifts.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(drifts)
}

fn walk(root: &Path, rel: &Path, deployed: &Path, drifts: &mut Vec<Drift>) -> Result<()> {
    let dir = root.join(rel);
    let entries = fs::read_dir(&dir)
        .map_err(|e| Error::from_io(format!("Failed to read dir: {}", dir.display()), &dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::from_io(format!("Failed to read dir entry: {}", dir.display()), &dir, e)
        })?;
        let rel_path = rel.join(entry.file_name());
        let source_path = entry.path();

        if source_path.is_dir() {
            walk(root, &rel_path, deployed, drifts)?;
            continue;
        }

        let target = deployed.join(&rel_path);
        let kind = if !target.is_file() {
            Some(DriftKind::Missing)
        } else if hash_file(&source_path)? != hash_file(&target)? {
            Some(DriftKind::Modified)
        } else {
            None
        };
        if let Some(kind) = kind {
            drifts.push(Drift {
                path: rel_path,
                kind,
            });
        }
    }
    Ok(())
}
