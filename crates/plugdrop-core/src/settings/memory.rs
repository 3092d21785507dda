//! In-memory settings backend.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use super::SettingsStore;
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<(String, String), String>,
    failing_keys: HashSet<String>,
}

/// Settings held in process memory. Writes to keys registered with
/// [`fail_writes_to`](Self::fail_writes_to) report `WriteFailure`.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: Mutex<Inner>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set(&self, namespace: &str, key: &str, value: &str) {
        self.lock()
            .values
            .insert((namespace.to_string(), key.to_string()), value.to_string());
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<String> {
        self.lock()
            .values
            .get(&(namespace.to_string(), key.to_string()))
            .cloned()
    }

    pub fn fail_writes_to(&self, key: &str) {
        self.lock().failing_keys.insert(key.to_string());
    }
}

impl SettingsStore for MemorySettingsStore {
    fn read_value(&self, namespace: &str, key: &str) -> Result<String> {
        self.get(namespace, key)
            .ok_or_else(|| Error::not_found(format!("setting {namespace}/{key}")))
    }

    fn write_value(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let mut inner = self.lock();
        if inner.failing_keys.contains(key) {
            return Err(Error::WriteFailure {
                key: key.to_string(),
                reason: "write rejected by store".to_string(),
            });
        }
        inner
            .values
            .insert((namespace.to_string(), key.to_string()), value.to_string());
        Ok(())
    }
}
