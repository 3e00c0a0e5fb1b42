//! Line item quantities.
//!
//! A quantity is always at least one. A line that would drop to zero is removed
//! from the cart instead, so zero is unrepresentable here.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors converting a requested amount into a [`Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// Amount is zero or negative.
    #[error("quantity must be a positive integer, got {0}")]
    NotPositive(i64),

    /// Amount does not fit the quantity range.
    #[error("quantity {0} is too large")]
    TooLarge(i64),
}

/// Number of units of one product in the cart (always `>= 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// The quantity plus one, or `None` on overflow.
    #[must_use]
    pub const fn checked_increment(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(amount: i64) -> Result<Self, Self::Error> {
        if amount <= 0 {
            return Err(QuantityError::NotPositive(amount));
        }
        u32::try_from(amount)
            .ok()
            .and_then(Self::new)
            .ok_or(QuantityError::TooLarge(amount))
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_amount() {
        assert_eq!(Quantity::try_from(3).map(Quantity::get), Ok(3));
        assert_eq!(Quantity::try_from(0), Err(QuantityError::NotPositive(0)));
        assert_eq!(Quantity::try_from(-2), Err(QuantityError::NotPositive(-2)));

        let too_big = i64::from(u32::MAX) + 1;
        assert_eq!(Quantity::try_from(too_big), Err(QuantityError::TooLarge(too_big)));
    }

    #[test]
    fn test_increment() {
        assert_eq!(Quantity::ONE.checked_increment(), Quantity::new(2));

        let max = Quantity::new(u32::MAX).unwrap();
        assert_eq!(max.checked_increment(), None);
    }

    #[test]
    fn test_zero_is_rejected_on_deserialize() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("4").unwrap().get(), 4);
    }
}
