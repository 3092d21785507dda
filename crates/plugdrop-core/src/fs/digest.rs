//! blake3 digests of files and directory trees.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Hex blake3 digest of one file's contents.
pub fn hash_file(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .map_err(|e| Error::from_io(format!("Failed to open {}", path.display()), path, e))?;
    let mut hasher = blake3::Hasher::new();
    hasher
        .update_reader(file)
        .map_err(|e| Error::from_io(format!("Failed to read {}", path.display()), path, e))?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// Deterministic digest of a directory tree.
///
/// Entries are visited in name order. Each directory contributes
/// `relpath || 0xFF`, each file `relpath || 0x00 || contents`, so two
/// trees hash equal exactly when they hold the same paths with the same
/// bytes. Permissions and timestamps are not part of the digest.
pub fn hash_tree(root: &Path) -> Result<String> {
    let mut hasher = blake3::Hasher::new();
    feed_dir(&mut hasher, root, "")?;
    Ok(hasher.finalize().to_hex().to_string())
}

fn feed_dir(hasher: &mut blake3::Hasher, dir: &Path, prefix: &str) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .and_then(|entries| entries.collect::<std::io::Result<Vec<_>>>())
        .map_err(|e| Error::from_io(format!("Failed to read dir: {}", dir.display()), dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let rel = if prefix.is_empty() {
            entry.file_name().to_string_lossy().into_owned()
        } else {
            format!("{prefix}/{}", entry.file_name().to_string_lossy())
        };
        let path = entry.path();

        if path.is_dir() {
            hasher.update(rel.as_bytes());
            hasher.update(&[0xFF]);
            feed_dir(hasher, &path, &rel)?;
        } else {
            hasher.update(rel.as_bytes());
            hasher.update(&[0x00]);
            let content = fs::read(&path).map_err(|e| {
                Error::from_io(format!("Failed to read {}", path.display()), &path, e)
            })?;
            hasher.update(&content);
        }
    }
    Ok(())
}
