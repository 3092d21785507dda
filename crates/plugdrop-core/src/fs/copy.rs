//! Recursive overwrite copy used to materialize manifests.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub dirs_created: usize,
    pub files_copied: usize,
    pub bytes_copied: u64,
}

/// Copy everything under `src` into `dst`, depth-first.
///
/// `dst` must already exist. Subdirectories are created as needed and
/// receive their source directory's permission bits once their contents
/// are in place. Files are copied whole and replace existing files.
///
/// The first failure aborts the walk; whatever was copied before it
/// stays in `dst`. Symlinks to files are copied as regular files.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<CopyStats> {
    let mut stats = CopyStats::default();
    copy_dir_contents(src, dst, &mut stats)?;
    Ok(stats)
}

fn copy_dir_contents(src: &Path, dst: &Path, stats: &mut CopyStats) -> Result<()> {
    let entries = fs::read_dir(src)
        .map_err(|e| Error::from_io(format!("Failed to read dir: {}", src.display()), src, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::from_io(format!("Failed to read dir entry: {}", src.display()), src, e)
        })?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let ty = entry.file_type().map_err(|e| {
            Error::from_io(format!("Failed to stat: {}", from.display()), &from, e)
        })?;

        if ty.is_dir() {
            copy_dir(&from, &to, stats)?;
        } else if ty.is_file() || (ty.is_symlink() && from.is_file()) {
            copy_file(&from, &to, stats)?;
        } else {
            return Err(Error::io(
                format!("Unsupported filesystem entry type at {}", from.display()),
                std::io::Error::from(std::io::ErrorKind::Unsupported),
            ));
        }
    }
    Ok(())
}

fn copy_dir(from: &Path, to: &Path, stats: &mut CopyStats) -> Result<()> {
    let existed = to.is_dir();
    fs::create_dir_all(to).map_err(|e| {
        Error::from_io(format!("Failed to create directory: {}", to.display()), to, e)
    })?;
    if !existed {
        stats.dirs_created += 1;
    }

    copy_dir_contents(from, to, stats)?;

    let permissions = fs::metadata(from)
        .map_err(|e| Error::from_io(format!("Failed to stat: {}", from.display()), from, e))?
        .permissions();
    fs::set_permissions(to, permissions).map_err(|e| {
        Error::from_io(
            format!("Failed to set permissions on {}", to.display()),
            to,
            e,
        )
    })
}

fn copy_file(from: &Path, to: &Path, stats: &mut CopyStats) -> Result<()> {
    let bytes = fs::copy(from, to).map_err(|e| {
        Error::from_io(
            format!(
                "Failed to copy file from {} to {}",
                from.display(),
                to.display()
            ),
            from,
            e,
        )
    })?;
    stats.files_copied += 1;
    stats.bytes_copied += bytes;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create_dir_all should succeed in test temp dirs");
        }
        fs::write(path, content).expect("write should succeed in test temp dirs");
    }

    #[test]
    fn copies_nested_tree_and_counts() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write_file(&src.join("a.lua"), "addappid(1)");
        write_file(&src.join("depots").join("b.manifest"), "bin");
        write_file(&src.join("depots").join("deep").join("c.txt"), "c");
        fs::create_dir_all(&dst).unwrap();

        let stats = copy_tree(&src, &dst).expect("copy should succeed");

        assert_eq!(stats.files_copied, 3);
        assert_eq!(stats.dirs_created, 2);
        assert_eq!(fs::read_to_string(dst.join("a.lua")).unwrap(), "addappid(1)");
        assert_eq!(
            fs::read_to_string(dst.join("depots").join("deep").join("c.txt")).unwrap(),
            "c"
        );
    }

    #[test]
    fn overwrites_existing_files_and_keeps_unrelated_ones() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write_file(&src.join("a.lua"), "new");
        write_file(&dst.join("a.lua"), "old and longer");
        write_file(&dst.join("other.lua"), "untouched");

        copy_tree(&src, &dst).expect("copy should succeed");

        assert_eq!(fs::read_to_string(dst.join("a.lua")).unwrap(), "new");
        assert_eq!(fs::read_to_string(dst.join("other.lua")).unwrap(), "untouched");
    }

    #[cfg(unix)]
    #[test]
    fn preserves_directory_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().expect("tempdir should succeed");
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write_file(&src.join("locked").join("f.txt"), "x");
        fs::create_dir_all(&dst).unwrap();
        fs::set_permissions(src.join("locked"), fs::Permissions::from_mode(0o750)).unwrap();

        copy_tree(&src, &dst).expect("copy should succeed");

        let mode = fs::metadata(dst.join("locked")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }

    #[test]
    fn missing_source_fails() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let err = copy_tree(&tmp.path().join("nope"), tmp.path()).unwrap_err();
        assert!(err.is_not_found());
    }
}
