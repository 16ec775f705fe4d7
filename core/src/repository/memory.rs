use std::collections::HashMap;

use crate::error::StorageError;
use crate::repository::traits::{validate_key, KeyValueStore};

/// In-process store. Can emulate a byte quota and an outage.
#[derive(Debug, Default, Clone)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
    unavailable: bool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the total stored bytes (keys plus values), like a browser quota.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Writes a raw blob, bypassing quota and availability checks.
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        if let Some(quota) = self.quota {
            let size = self.used_bytes_without(key) + key.len() + value.len();
            if size > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    quota,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_exceeded_keeps_previous_value() {
        let mut store = MemoryKeyValueStore::with_quota(10);
        store.set("k", "1234").unwrap();
        let err = store.set("k", "0123456789").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { size: 11, quota: 10, .. }));
        assert_eq!(store.raw("k"), Some("1234"));
    }

    #[test]
    fn test_unavailable() {
        let mut store = MemoryKeyValueStore::new();
        store.set_unavailable(true);
        assert!(matches!(store.get("k"), Err(StorageError::Unavailable)));
        assert!(matches!(store.set("k", "v"), Err(StorageError::Unavailable)));
    }
}
