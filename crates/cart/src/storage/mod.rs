//! Durable string-keyed storage for the serialized cart.
//!
//! The store behaves like browser local storage: one string value per key,
//! every write a full overwrite. The cart is read once when a
//! [`CartStore`](crate::CartStore) loads and written after every commit.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

/// Key the cart is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Errors from the persistent store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be decoded.
    #[error("storage is corrupt: {0}")]
    Corrupt(String),

    /// Store refused the operation (quota, read-only, disabled).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable key-value slot.
pub trait PersistentStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: String) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl<T: PersistentStore> PersistentStore for Arc<T> {
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: String) -> impl Future<Output = Result<(), StorageError>> + Send {
        (**self).write(key, value)
    }
}
