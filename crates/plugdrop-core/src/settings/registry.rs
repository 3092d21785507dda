//! Windows registry settings under `HKEY_CURRENT_USER`.
//!
//! Namespaces map to subkeys (`Software/Vendor/App` becomes
//! `Software\Vendor\App`). Values are `REG_SZ`.

use std::io;

use tracing::debug;
use winreg::RegKey;
use winreg::enums::{HKEY_CURRENT_USER, KEY_QUERY_VALUE};

use super::SettingsStore;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrySettingsStore;

impl RegistrySettingsStore {
    pub fn current_user() -> Self {
        Self
    }
}

fn subkey(namespace: &str) -> String {
    namespace.replace('/', "\\")
}

impl SettingsStore for RegistrySettingsStore {
    fn read_value(&self, namespace: &str, key: &str) -> Result<String> {
        let missing = || Error::not_found(format!("setting {namespace}/{key}"));
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);

        let read = hkcu
            .open_subkey_with_flags(subkey(namespace), KEY_QUERY_VALUE)
            .and_then(|reg| reg.get_value::<String, _>(key));
        match read {
            Ok(value) => Ok(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(missing()),
            Err(e) => Err(Error::io(
                format!("Failed to read registry value {namespace}/{key}"),
                e,
            )),
        }
    }

    fn write_value(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let path = subkey(namespace);
        let to_error = |e: io::Error| match e.kind() {
            io::ErrorKind::PermissionDenied => Error::AccessDenied {
                path: format!("HKCU\\{path}").into(),
                source: e,
            },
            _ => Error::WriteFailure {
                key: key.to_string(),
                reason: e.to_string(),
            },
        };

        let (reg, _) = RegKey::predef(HKEY_CURRENT_USER)
            .create_subkey(&path)
            .map_err(to_error)?;
        reg.set_value(key, &value.to_string()).map_err(to_error)?;
        debug!(namespace, key, "registry value written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_become_subkeys() {
        assert_eq!(subkey("Software/Vendor/App"), "Software\\Vendor\\App");
    }

    #[test]
    fn write_then_read_under_current_user() {
        let namespace = format!("Software/plugdrop-test-{}", std::process::id());
        let store = RegistrySettingsStore::current_user();

        assert!(store.read_value(&namespace, "Flag").unwrap_err().is_not_found());

        store.write_value(&namespace, "Flag", "true").unwrap();
        assert_eq!(store.read_value(&namespace, "Flag").unwrap(), "true");

        RegKey::predef(HKEY_CURRENT_USER)
            .delete_subkey_all(subkey(&namespace))
            .unwrap();
    }
}
