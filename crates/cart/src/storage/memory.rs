//! In-process storage.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{PersistentStore, StorageError};

/// Key-value store held in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with one value.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let values = HashMap::from([(key.into(), value.into())]);
        Self {
            values: RwLock::new(values),
        }
    }

    /// Current value under `key`.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }
}

impl PersistentStore for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key).await)
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
