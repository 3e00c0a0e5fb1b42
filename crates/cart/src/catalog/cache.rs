//! Cache for product lookups.

use std::time::Duration;

use moka::future::Cache;
use rocket_cart_core::{DisplayAttributes, ProductId};

const MAX_CACHED_PRODUCTS: u64 = 1000;

/// Product display attributes keyed by product ID.
///
/// A zero TTL disables caching entirely.
#[derive(Clone)]
pub struct ProductCache {
    inner: Option<Cache<ProductId, DisplayAttributes>>,
}

impl ProductCache {
    pub fn new(ttl: Duration) -> Self {
        let inner = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(MAX_CACHED_PRODUCTS)
                .time_to_live(ttl)
                .build()
        });
        Self { inner }
    }

    pub async fn get(&self, product_id: &ProductId) -> Option<DisplayAttributes> {
        match &self.inner {
            Some(cache) => cache.get(product_id).await,
            None => None,
        }
    }

    pub async fn insert(&self, product_id: ProductId, display: DisplayAttributes) {
        if let Some(cache) = &self.inner {
            cache.insert(product_id, display).await;
        }
    }
}
