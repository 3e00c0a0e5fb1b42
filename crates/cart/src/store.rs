//! The cart store: state, transitions, validation and persistence.
//!
//! # Ordering
//!
//! Mutating operations queue on a fair async mutex and hold it for their whole
//! run, collaborator calls included. Each operation reads the current state
//! only after acquiring it, so a candidate state is always derived from the
//! state as it stands at commit time and no update is ever lost. Storage writes
//! happen under the same lock and therefore land in commit order.
//!
//! # Failures
//!
//! A failing operation leaves the state untouched, notifies the shopper with
//! the operation's fixed message and returns the error. A failed storage write
//! does not undo a commit.

use std::fmt;
use std::sync::Arc;

use rocket_cart_core::{CartState, LineItem, ProductId, Quantity};
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::{Catalog, StockOracle};
use crate::error::{CartError, Operation, SAVE_FAILED};
use crate::notify::Notifier;
use crate::storage::{PersistentStore, StorageError};

/// Shopping cart store.
///
/// Cheaply cloneable via `Arc`; clones share state, collaborators and the
/// operation queue. Pass it explicitly to whatever renders or reads the cart.
pub struct CartStore<C, S, P, N> {
    inner: Arc<CartStoreInner<C, S, P, N>>,
}

struct CartStoreInner<C, S, P, N> {
    catalog: C,
    stock: S,
    storage: P,
    notifier: N,
    storage_key: String,
    state: watch::Sender<CartState>,
    ops: Mutex<()>,
}

impl<C, S, P, N> Clone for CartStore<C, S, P, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, S, P, N> fmt::Debug for CartStore<C, S, P, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("storage_key", &self.inner.storage_key)
            .field("lines", &self.inner.state.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<C, S, P, N> CartStore<C, S, P, N>
where
    C: Catalog,
    S: StockOracle,
    P: PersistentStore,
    N: Notifier,
{
    /// Load the cart stored under `storage_key` and build a store around it.
    ///
    /// Never fails: a missing, malformed or unreadable stored cart yields an
    /// empty cart. Nothing is written back during loading.
    #[instrument(skip_all, fields(storage_key = tracing::field::Empty))]
    pub async fn load(
        catalog: C,
        stock: S,
        storage: P,
        notifier: N,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        tracing::Span::current().record("storage_key", storage_key.as_str());

        let initial = load_state(&storage, &storage_key).await;
        let (state, _) = watch::channel(initial);

        Self {
            inner: Arc::new(CartStoreInner {
                catalog,
                stock,
                storage,
                notifier,
                storage_key,
                state,
                ops: Mutex::new(()),
            }),
        }
    }

    /// Current cart contents.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every committed state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.inner.state.subscribe()
    }

    /// Total units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.inner.state.borrow().item_count()
    }

    /// Key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.storage_key
    }

    /// Add one unit of `product_id`.
    ///
    /// An existing line is incremented exactly as `set_quantity(id, qty + 1)`
    /// would, stock check included. A new product is looked up in the catalog
    /// and appended with quantity one, without a stock check.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductLookup` if a new product cannot be fetched,
    /// or any `set_quantity` error when incrementing. The shopper has already
    /// been notified.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_item(&self, product_id: &ProductId) -> Result<(), CartError> {
        let _queued = self.inner.ops.lock().await;
        let current = self.snapshot();

        if let Some(item) = current.get(product_id) {
            let result = match item.quantity().checked_increment() {
                Some(next) => {
                    self.plan_set_quantity(&current, product_id, i64::from(next.get()))
                        .await
                }
                None => Err(CartError::Validation(format!(
                    "quantity of product {product_id} is already at its maximum"
                ))),
            };
            return self.finish(Operation::SetQuantity, result).await;
        }

        let result = self.plan_add(&current, product_id).await;
        self.finish(Operation::AddItem, result).await
    }

    /// Remove the line for `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if the product is not in the cart.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_item(&self, product_id: &ProductId) -> Result<(), CartError> {
        let _queued = self.inner.ops.lock().await;
        let current = self.snapshot();

        let result = current
            .without(product_id)
            .ok_or_else(|| CartError::NotFound(product_id.clone()));
        self.finish(Operation::RemoveItem, result).await
    }

    /// Set the line for `product_id` to exactly `amount` units.
    ///
    /// # Errors
    ///
    /// - `CartError::Validation` if the product is not in the cart or `amount` is not positive
    /// - `CartError::StockLookup` if available stock cannot be determined
    /// - `CartError::OutOfStock` if `amount` exceeds available stock
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn set_quantity(&self, product_id: &ProductId, amount: i64) -> Result<(), CartError> {
        let _queued = self.inner.ops.lock().await;
        let current = self.snapshot();

        let result = self.plan_set_quantity(&current, product_id, amount).await;
        self.finish(Operation::SetQuantity, result).await
    }

    /// Candidate state with a freshly looked-up product appended.
    async fn plan_add(
        &self,
        current: &CartState,
        product_id: &ProductId,
    ) -> Result<CartState, CartError> {
        let display = self
            .inner
            .catalog
            .get_product(product_id)
            .await
            .map_err(CartError::ProductLookup)?;

        let item = LineItem::new(product_id.clone(), display, Quantity::ONE);
        current
            .with_item(item)
            .map_err(|e| CartError::Validation(e.to_string()))
    }

    /// Candidate state with `product_id` set to `amount`, validated against stock.
    async fn plan_set_quantity(
        &self,
        current: &CartState,
        product_id: &ProductId,
        amount: i64,
    ) -> Result<CartState, CartError> {
        if !current.contains(product_id) {
            return Err(CartError::Validation(format!(
                "product {product_id} is not in the cart"
            )));
        }
        let requested =
            Quantity::try_from(amount).map_err(|e| CartError::Validation(e.to_string()))?;

        let available = self
            .inner
            .stock
            .get_available(product_id)
            .await
            .map_err(CartError::StockLookup)?;

        if requested.get() > available {
            return Err(CartError::OutOfStock {
                product_id: product_id.clone(),
                requested: requested.get(),
                available,
            });
        }

        current
            .with_quantity(product_id, requested)
            .ok_or_else(|| CartError::Validation(format!("product {product_id} is not in the cart")))
    }

    /// Commit a successful candidate, or report a failure.
    async fn finish(
        &self,
        operation: Operation,
        result: Result<CartState, CartError>,
    ) -> Result<(), CartError> {
        match result {
            Ok(next) => {
                self.commit(next).await;
                Ok(())
            }
            Err(error) => {
                warn!(operation = operation.as_str(), error = %error, "Cart operation failed");
                self.inner
                    .notifier
                    .notify(operation.failure_message(&error));
                Err(error)
            }
        }
    }

    /// Publish `next` to observers, then persist it.
    async fn commit(&self, next: CartState) {
        let serialized = serde_json::to_string(&next);
        debug!(lines = next.len(), items = next.item_count(), "Committing cart");
        self.inner.state.send_replace(next);

        let written = match serialized {
            Ok(json) => {
                self.inner
                    .storage
                    .write(&self.inner.storage_key, json)
                    .await
            }
            Err(e) => Err(StorageError::Corrupt(e.to_string())),
        };

        if let Err(e) = written {
            error!(error = %e, storage_key = %self.inner.storage_key, "Failed to persist cart");
            self.inner.notifier.notify(SAVE_FAILED);
        }
    }
}

/// Read and decode the stored cart, falling back to an empty one.
async fn load_state<P: PersistentStore>(storage: &P, storage_key: &str) -> CartState {
    let raw = match storage.read(storage_key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored cart, starting empty");
            return CartState::new();
        }
        Err(e) => {
            warn!(error = %e, "Failed to read stored cart, starting empty");
            return CartState::new();
        }
    };

    match serde_json::from_str::<CartState>(&raw) {
        Ok(state) => {
            info!(lines = state.len(), "Restored cart");
            state
        }
        Err(e) => {
            warn!(error = %e, "Stored cart is malformed, starting empty");
            CartState::new()
        }
    }
}
