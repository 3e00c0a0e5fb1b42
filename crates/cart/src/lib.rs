//! Rocket Cart - shopping cart state manager.
//!
//! Tracks a shopper's line items, keeps them durable across sessions, and never
//! lets a line's quantity exceed the stock reported by the remote service.
//!
//! # Architecture
//!
//! - [`store::CartStore`] owns the cart state and runs every mutation
//! - [`catalog`] answers "what is product P" and "how many units of P exist"
//! - [`storage`] is a durable string-keyed slot read at load, written on commit
//! - [`notify`] surfaces failures to the shopper
//!
//! All collaborators are traits, so the store can run against the HTTP service
//! and a JSON file in production, and against in-memory doubles in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_cart::{ApiClient, CartConfig, CartStore, FileStorage, TracingNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let api = ApiClient::new(&config.api)?;
//! let cart = CartStore::load(
//!     api.clone(),
//!     api,
//!     FileStorage::new(&config.storage_path),
//!     TracingNotifier,
//!     config.storage_key.clone(),
//! )
//! .await;
//!
//! cart.add_item(&"P1".into()).await.ok();
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use catalog::{ApiClient, Catalog, CatalogError, StockOracle};
pub use config::{CartConfig, CatalogApiConfig, ConfigError};
pub use error::{CartError, Operation};
pub use notify::{ChannelNotifier, Notifier, TracingNotifier};
pub use storage::{DEFAULT_STORAGE_KEY, FileStorage, MemoryStorage, PersistentStore, StorageError};
pub use store::CartStore;

pub use rocket_cart_core::{CartState, DisplayAttributes, LineItem, ProductId, Quantity};
