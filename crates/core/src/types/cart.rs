//! Cart state and its pure transitions.
//!
//! Every transition returns a new [`CartState`] and leaves the receiver
//! untouched, so a failed operation can simply drop its candidate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::line_item::LineItem;
use super::quantity::Quantity;

/// Attempted to hold two line items for the same product.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("product {0} already has a line item")]
pub struct DuplicateLineItem(pub ProductId);

/// Ordered collection of line items, at most one per product.
///
/// Serialized as a JSON array of [`LineItem`]. Deserialization rejects
/// duplicate product IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct CartState {
    items: Vec<LineItem>,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line item for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items
            .iter()
            .find(|item| item.product_id() == product_id)
    }

    /// Whether the cart holds a line for `product_id`.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Line items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Line items as a slice.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines (cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity().get()))
            .sum()
    }

    /// Append a new line item.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateLineItem` if the product already has a line.
    pub fn with_item(&self, item: LineItem) -> Result<Self, DuplicateLineItem> {
        if self.contains(item.product_id()) {
            return Err(DuplicateLineItem(item.product_id().clone()));
        }
        let mut items = self.items.clone();
        items.push(item);
        Ok(Self { items })
    }

    /// Cart without the line for `product_id`, or `None` if it is absent.
    #[must_use]
    pub fn without(&self, product_id: &ProductId) -> Option<Self> {
        if !self.contains(product_id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.product_id() != product_id)
            .cloned()
            .collect();
        Some(Self { items })
    }

    /// Cart with `product_id` set to exactly `quantity`, or `None` if it is absent.
    ///
    /// All other lines are left untouched.
    #[must_use]
    pub fn with_quantity(&self, product_id: &ProductId, quantity: Quantity) -> Option<Self> {
        if !self.contains(product_id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.product_id() == product_id {
                    item.with_quantity(quantity)
                } else {
                    item.clone()
                }
            })
            .collect();
        Some(Self { items })
    }
}

impl TryFrom<Vec<LineItem>> for CartState {
    type Error = DuplicateLineItem;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        items
            .into_iter()
            .try_fold(Self::new(), |cart, item| cart.with_item(item))
    }
}

impl From<CartState> for Vec<LineItem> {
    fn from(cart: CartState) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a CartState {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
