//! Remote catalog and stock collaborators.
//!
//! # Architecture
//!
//! - [`Catalog`] returns a product's display attributes (name, price, image)
//! - [`StockOracle`] returns how many units of a product are available
//! - [`ApiClient`] implements both against the JSON REST service
//!
//! The service is the source of truth for stock, so stock answers are never
//! cached. Product lookups are cached via `moka` because display attributes are
//! copied once at add time anyway.

mod cache;
mod client;

pub use client::ApiClient;

use std::future::Future;
use std::sync::Arc;

use rocket_cart_core::{DisplayAttributes, ProductId};
use thiserror::Error;

/// Errors that can occur when talking to the catalog/stock service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Product does not exist.
    #[error("Not found: {0}")]
    NotFound(ProductId),

    /// Service returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the service.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Response body was not what we expected.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Product detail lookup.
pub trait Catalog: Send + Sync {
    /// Fetch the display attributes of `product_id`.
    fn get_product(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<DisplayAttributes, CatalogError>> + Send;
}

/// Authoritative available-stock lookup.
pub trait StockOracle: Send + Sync {
    /// Number of units of `product_id` currently available.
    fn get_available(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<u32, CatalogError>> + Send;
}

impl<T: Catalog> Catalog for Arc<T> {
    fn get_product(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<DisplayAttributes, CatalogError>> + Send {
        (**self).get_product(product_id)
    }
}

impl<T: StockOracle> StockOracle for Arc<T> {
    fn get_available(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<u32, CatalogError>> + Send {
        (**self).get_available(product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound(ProductId::new("P9").unwrap());
        assert_eq!(err.to_string(), "Not found: P9");

        let err = CatalogError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - maintenance");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = CatalogError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
