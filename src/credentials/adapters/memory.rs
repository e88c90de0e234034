//! In-memory key-value store for tests and ephemeral sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::credentials::ports::{KeyValueResult, KeyValueStore, KeyValueStoreError};

/// Thread-safe in-memory key-value store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw stored value, bypassing the async port.
    ///
    /// # Errors
    ///
    /// Returns storage errors when lock acquisition fails.
    pub fn raw(&self, key: &str) -> KeyValueResult<Option<String>> {
        let entries = self.entries.read().map_err(|err| {
            KeyValueStoreError::storage(std::io::Error::other(err.to_string()))
        })?;
        Ok(entries.get(key).cloned())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> KeyValueResult<Option<String>> {
        self.raw(key)
    }

    async fn set(&self, key: &str, value: &str) -> KeyValueResult<()> {
        let mut entries = self.entries.write().map_err(|err| {
            KeyValueStoreError::storage(std::io::Error::other(err.to_string()))
        })?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> KeyValueResult<()> {
        let mut entries = self.entries.write().map_err(|err| {
            KeyValueStoreError::storage(std::io::Error::other(err.to_string()))
        })?;
        entries.remove(key);
        Ok(())
    }
}
