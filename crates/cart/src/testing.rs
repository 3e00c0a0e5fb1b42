//! In-memory collaborators for tests.
//!
//! Enabled with the `test-util` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rocket_cart_core::{DisplayAttributes, ProductId};
use serde_json::Value;

use crate::catalog::{Catalog, CatalogError, StockOracle};
use crate::notify::Notifier;
use crate::storage::{MemoryStorage, PersistentStore, StorageError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Catalog and stock oracle backed by maps.
///
/// Lookups can be forced to fail and can be slowed down to widen race windows.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    products: Mutex<HashMap<ProductId, DisplayAttributes>>,
    stock: Mutex<HashMap<ProductId, u32>>,
    fail_catalog: AtomicBool,
    fail_stock: AtomicBool,
    delay: Option<Duration>,
    catalog_calls: AtomicUsize,
    stock_calls: AtomicUsize,
}

impl StaticCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with its catalog JSON and available stock.
    ///
    /// Non-object JSON is stored as empty display attributes.
    #[must_use]
    pub fn with_product(self, id: ProductId, product: Value, stock: u32) -> Self {
        let display = match product {
            Value::Object(map) => DisplayAttributes::from_map(map),
            _ => DisplayAttributes::default(),
        };
        lock(&self.products).insert(id.clone(), display);
        lock(&self.stock).insert(id, stock);
        self
    }

    /// Sleep this long inside every lookup.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Change the available stock of a product.
    pub fn set_stock(&self, id: ProductId, stock: u32) {
        lock(&self.stock).insert(id, stock);
    }

    /// Make product lookups fail with a transport-style error.
    pub fn fail_catalog(&self, fail: bool) {
        self.fail_catalog.store(fail, Ordering::SeqCst);
    }

    /// Make stock lookups fail with a transport-style error.
    pub fn fail_stock(&self, fail: bool) {
        self.fail_stock.store(fail, Ordering::SeqCst);
    }

    /// Number of product lookups served so far.
    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    /// Number of stock lookups served so far.
    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn unavailable() -> CatalogError {
    CatalogError::Api {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

impl Catalog for StaticCatalog {
    async fn get_product(&self, product_id: &ProductId) -> Result<DisplayAttributes, CatalogError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        lock(&self.products)
            .get(product_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(product_id.clone()))
    }
}

impl StockOracle for StaticCatalog {
    async fn get_available(&self, product_id: &ProductId) -> Result<u32, CatalogError> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_stock.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        lock(&self.stock)
            .get(product_id)
            .copied()
            .ok_or_else(|| CatalogError::NotFound(product_id.clone()))
    }
}

/// Notifier that remembers every message.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// A notifier with no messages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }

    /// Most recent message.
    pub fn last(&self) -> Option<String> {
        lock(&self.messages).last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        lock(&self.messages).push(message.to_string());
    }
}

/// Memory storage whose reads and writes can be switched to fail.
#[derive(Debug, Default)]
pub struct FailingStorage {
    inner: MemoryStorage,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FailingStorage {
    /// Storage that currently succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make reads fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make writes fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The stored value under `key`, bypassing failure switches.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await
    }
}

impl PersistentStore for FailingStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("reads disabled".to_string()));
        }
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, value: String) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.write(key, value).await
    }
}
