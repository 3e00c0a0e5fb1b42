//! JSON file storage.
//!
//! All keys live in one JSON object on disk, the way browser local storage
//! keeps every key for an origin in one place. Writes go to a sibling temp
//! file first and are renamed over the original, so a crash mid-write leaves
//! the previous contents intact.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{PersistentStore, StorageError};

type Entries = BTreeMap<String, String>;

/// Key-value store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Storage backed by the file at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_entries(&self) -> Result<Entries, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            StorageError::Corrupt(format!("{}: {e}", self.path.display()))
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PersistentStore for FileStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut entries = self.load_entries().await?;
        Ok(entries.remove(key))
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = match self.load_entries().await {
            Ok(entries) => entries,
            Err(StorageError::Corrupt(reason)) => {
                warn!(%reason, "Discarding corrupt storage file");
                Entries::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value);

        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        debug!(path = %self.path.display(), key, "Wrote storage file");
        Ok(())
    }
}
