//! File-backed settings: one TOML table per namespace.
//!
//! ```toml
//! ["Software/Vendor/App"]
//! InstallPath = "/opt/app"
//! ```

use std::io;
use std::path::{Path, PathBuf};

use toml::{Table, Value};

use super::SettingsStore;
use crate::error::{Error, Result};
use crate::fs::write_atomic;

#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current document, or `None` when the file does not exist yet.
    fn load(&self) -> Result<Option<Table>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::from_io(
                    format!("Failed to read settings: {}", self.path.display()),
                    &self.path,
                    e,
                ));
            }
        };
        content.parse::<Table>().map(Some).map_err(|e| {
            Error::Config(format!(
                "Failed to parse settings {}: {}",
                self.path.display(),
                e.message()
            ))
        })
    }

    fn save(&self, table: &Table, key: &str) -> Result<()> {
        let write_failure = |reason: String| Error::WriteFailure {
            key: key.to_string(),
            reason,
        };
        let content = toml::to_string(table).map_err(|e| write_failure(e.to_string()))?;

        write_atomic(&self.path, content.as_bytes()).map_err(|e| match e.kind() {
            io::ErrorKind::PermissionDenied => Error::AccessDenied {
                path: self.path.clone(),
                source: e,
            },
            _ => write_failure(e.to_string()),
        })
    }
}

impl SettingsStore for TomlSettingsStore {
    fn read_value(&self, namespace: &str, key: &str) -> Result<String> {
        let missing = || Error::not_found(format!("setting {namespace}/{key}"));
        let table = self.load()?.ok_or_else(missing)?;

        match table
            .get(namespace)
            .and_then(Value::as_table)
            .and_then(|ns| ns.get(key))
        {
            Some(Value::String(value)) => Ok(value.clone()),
            Some(Value::Boolean(value)) => Ok(value.to_string()),
            Some(_) => Err(Error::Config(format!(
                "setting {namespace}/{key} is not a string"
            ))),
            None => Err(missing()),
        }
    }

    fn write_value(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let mut table = match self.load() {
            Ok(table) => table.unwrap_or_default(),
            Err(Error::Config(reason)) => {
                return Err(Error::WriteFailure {
                    key: key.to_string(),
                    reason,
                });
            }
            Err(e) => return Err(e),
        };

        let entry = table
            .entry(namespace.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        let Value::Table(ns) = entry else {
            return Err(Error::WriteFailure {
                key: key.to_string(),
                reason: format!("{namespace} is not a table"),
            });
        };
        ns.insert(key.to_string(), Value::String(value.to_string()));

        self.save(&table, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_not_found() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let store = TomlSettingsStore::new(tmp.path().join("settings.toml"));

        let err = store.read_value("Software/Vendor/App", "InstallPath").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn write_creates_file_and_preserves_other_namespaces() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let path = tmp.path().join("nested").join("settings.toml");
        let store = TomlSettingsStore::new(path.clone());

        store
            .write_value("Software/Vendor/App", "InstallPath", "/opt/app")
            .expect("write should succeed");
        store
            .write_value("Software/Vendor/App/Behavior", "BehaviorEnabled", "true")
            .expect("write should succeed");

        assert!(path.exists());
        assert_eq!(
            store.read_value("Software/Vendor/App", "InstallPath").unwrap(),
            "/opt/app"
        );
        assert_eq!(
            store
                .read_value("Software/Vendor/App/Behavior", "BehaviorEnabled")
                .unwrap(),
            "true"
        );
    }

    #[test]
    fn last_write_wins() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let path = tmp.path().join("settings.toml");
        let first = TomlSettingsStore::new(path.clone());
        let second = TomlSettingsStore::new(path);

        first.write_value("ns", "Flag", "true").unwrap();
        second.write_value("ns", "Flag", "false").unwrap();

        assert_eq!(first.read_value("ns", "Flag").unwrap(), "false");
    }

    #[test]
    fn corrupt_file_fails_writes() {
        let tmp = TempDir::new().expect("tempdir should succeed");
        let path = tmp.path().join("settings.toml");
        std::fs::write(&path, "not [valid toml").unwrap();
        let store = TomlSettingsStore::new(path);

        let err = store.write_value("ns", "Flag", "true").unwrap_err();
        assert!(matches!(err, Error::WriteFailure { .. }));
    }
}
