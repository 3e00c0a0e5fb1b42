//! Integration tests for Rocket Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocket-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Operation behaviour and shopper-facing messages
//! - `cart_concurrency` - Queued operations never lose updates
//! - `cart_persistence` - File-backed storage across sessions
//! - `cart_properties` - Invariants over random operation sequences
//!
//! Every test runs against in-memory collaborators from `rocket_cart::testing`;
//! no network service is needed.

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::sync::Arc;

use rocket_cart::testing::{RecordingNotifier, StaticCatalog};
use rocket_cart::{CartState, CartStore, DEFAULT_STORAGE_KEY, PersistentStore, ProductId};
use serde_json::json;

/// Store wired to shared in-memory doubles.
pub type TestStore<P> =
    CartStore<Arc<StaticCatalog>, Arc<StaticCatalog>, Arc<P>, Arc<RecordingNotifier>>;

/// A loaded store plus handles on its collaborators.
pub struct TestContext<P> {
    pub store: TestStore<P>,
    pub catalog: Arc<StaticCatalog>,
    pub storage: Arc<P>,
    pub notifier: Arc<RecordingNotifier>,
}

impl<P: PersistentStore> TestContext<P> {
    /// Load a store over `catalog` and `storage` using the default key.
    pub async fn new(catalog: StaticCatalog, storage: P) -> Self {
        Self::with_shared(Arc::new(catalog), Arc::new(storage)).await
    }

    /// Load a store over already-shared collaborators (e.g. a second session).
    pub async fn with_shared(catalog: Arc<StaticCatalog>, storage: Arc<P>) -> Self {
        let notifier = Arc::new(RecordingNotifier::new());
        let store = CartStore::load(
            Arc::clone(&catalog),
            Arc::clone(&catalog),
            Arc::clone(&storage),
            Arc::clone(&notifier),
            DEFAULT_STORAGE_KEY,
        )
        .await;

        Self {
            store,
            catalog,
            storage,
            notifier,
        }
    }
}

/// The catalog used across scenarios.
///
/// | id | name  | price | stock |
/// |----|-------|-------|-------|
/// | P1 | Shoe  | 100   | 5     |
/// | P2 | Boot  | 150   | 3     |
/// | P3 | Sock  | 10    | 1     |
#[must_use]
pub fn shoe_catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with_product(pid("P1"), json!({"name": "Shoe", "price": 100}), 5)
        .with_product(pid("P2"), json!({"name": "Boot", "price": 150}), 3)
        .with_product(pid("P3"), json!({"name": "Sock", "price": 10}), 1)
}

/// Shorthand for a product ID.
#[must_use]
pub fn pid(raw: &str) -> ProductId {
    raw.parse().unwrap()
}

/// `(product id, quantity)` pairs in cart order.
#[must_use]
pub fn lines(state: &CartState) -> Vec<(String, u32)> {
    state
        .iter()
        .map(|item| (item.product_id().to_string(), item.quantity().get()))
        .collect()
}

/// Owned `(product id, quantity)` pairs from literals.
#[must_use]
pub fn expected(pairs: &[(&str, u32)]) -> Vec<(String, u32)> {
    pairs.iter().map(|(id, qty)| ((*id).to_string(), *qty)).collect()
}
