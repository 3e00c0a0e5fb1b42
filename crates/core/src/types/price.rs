//! Display prices.
//!
//! The cart does not compute totals or discounts. Prices only travel with a
//! line item's display attributes and are formatted for rendering.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog price, in the store's standard currency unit (e.g., dollars, not cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse a price from a catalog JSON value (number or numeric string).
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.to_string().parse().ok().map(Self),
            serde_json::Value::String(s) => s.trim().parse().ok().map(Self),
            _ => None,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}
