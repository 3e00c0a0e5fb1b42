//! Cart operation errors and their user-facing messages.
//!
//! Every failure is reported to the shopper through the
//! [`Notifier`](crate::Notifier) with one fixed message per operation and
//! failure class. The structured error is still returned so callers can branch
//! on it, but the shopper has already been told.

use rocket_cart_core::ProductId;
use thiserror::Error;

use crate::catalog::CatalogError;

/// Shown when a brand-new product cannot be added.
pub const ADD_FAILED: &str = "product addition failed";
/// Shown when removing a product fails.
pub const REMOVE_FAILED: &str = "product removal failed";
/// Shown when a quantity change fails for any reason other than stock.
pub const UPDATE_FAILED: &str = "quantity update failed";
/// Shown when a quantity change asks for more than is in stock.
pub const OUT_OF_STOCK: &str = "requested quantity exceeds available stock";
/// Shown when a commit could not be written to storage.
pub const SAVE_FAILED: &str = "cart changes could not be saved";

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Bad input, or a quantity change for a product not in the cart.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Removal of a product that is not in the cart.
    #[error("product {0} is not in the cart")]
    NotFound(ProductId),

    /// Requested quantity exceeds available stock.
    #[error("requested {requested} of product {product_id} but only {available} available")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Catalog lookup for a new product failed.
    #[error("product lookup failed: {0}")]
    ProductLookup(#[source] CatalogError),

    /// Stock lookup failed.
    #[error("stock lookup failed: {0}")]
    StockLookup(#[source] CatalogError),
}

/// The cart operation a failure is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddItem,
    RemoveItem,
    SetQuantity,
}

impl Operation {
    /// Operation name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddItem => "add_item",
            Self::RemoveItem => "remove_item",
            Self::SetQuantity => "set_quantity",
        }
    }

    /// Message shown to the shopper when this operation fails with `error`.
    #[must_use]
    pub fn failure_message(self, error: &CartError) -> &'static str {
        match (self, error) {
            (_, CartError::OutOfStock { .. }) => OUT_OF_STOCK,
            (Self::AddItem, _) => ADD_FAILED,
            (Self::RemoveItem, _) => REMOVE_FAILED,
            (Self::SetQuantity, _) => UPDATE_FAILED,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn out_of_stock() -> CartError {
        CartError::OutOfStock {
            product_id: ProductId::new("P1").unwrap(),
            requested: 2,
            available: 1,
        }
    }

    #[test]
    fn test_cart_error_display() {
        assert_eq!(
            out_of_stock().to_string(),
            "requested 2 of product P1 but only 1 available"
        );
        assert_eq!(
            CartError::NotFound(ProductId::new("P9").unwrap()).to_string(),
            "product P9 is not in the cart"
        );
        assert_eq!(
            CartError::ProductLookup(CatalogError::NotFound(ProductId::new("P9").unwrap())).to_string(),
            "product lookup failed: Not found: P9"
        );
    }

    #[test]
    fn test_failure_messages() {
        let lookup = CartError::ProductLookup(CatalogError::RateLimited(1));
        assert_eq!(Operation::AddItem.failure_message(&lookup), ADD_FAILED);

        let missing = CartError::NotFound(ProductId::new("P9").unwrap());
        assert_eq!(Operation::RemoveItem.failure_message(&missing), REMOVE_FAILED);

        let invalid = CartError::Validation("amount must be positive".to_string());
        assert_eq!(Operation::SetQuantity.failure_message(&invalid), UPDATE_FAILED);

        let stock = CartError::StockLookup(CatalogError::Parse("bad".to_string()));
        assert_eq!(Operation::SetQuantity.failure_message(&stock), UPDATE_FAILED);

        assert_eq!(Operation::SetQuantity.failure_message(&out_of_stock()), OUT_OF_STOCK);
    }
}
