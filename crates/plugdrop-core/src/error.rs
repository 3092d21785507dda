//! Error taxonomy shared by every core component.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A setting, manifest, or executable that should exist does not.
    #[error("{what} not found")]
    NotFound { what: String },

    #[error("access denied: {}", path.display())]
    AccessDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// A persisted setting could not be written. Earlier writes of the
    /// same batch are left in place.
    #[error("failed to write {key}: {reason}")]
    WriteFailure { key: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Classify an I/O failure on `path`.
    pub fn from_io(context: impl Into<String>, path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                what: path.display().to_string(),
            },
            io::ErrorKind::PermissionDenied => Self::AccessDenied {
                path: path.to_path_buf(),
                source,
            },
            _ => Self::Io {
                context: context.into(),
                source,
            },
        }
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_io_classifies_by_kind() {
        let path = Path::new("/tmp/x");

        let err = Error::from_io("stat", path, io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());

        let err = Error::from_io(
            "stat",
            path,
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, Error::AccessDenied { .. }));
        assert_eq!(err.to_string(), "access denied: /tmp/x");

        let err = Error::from_io("stat", path, io::Error::other("disk on fire"));
        assert_eq!(err.to_string(), "stat: disk on fire");
    }
}
