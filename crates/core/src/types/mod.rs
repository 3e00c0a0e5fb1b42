//! Core types for Rocket Cart.
//!
//! This module provides type-safe wrappers for cart domain concepts.

pub mod cart;
pub mod id;
pub mod line_item;
pub mod price;
pub mod quantity;

pub use cart::{CartState, DuplicateLineItem};
pub use id::{EmptyProductId, ProductId};
pub use line_item::{DisplayAttributes, LineItem};
pub use price::Price;
pub use quantity::{Quantity, QuantityError};
