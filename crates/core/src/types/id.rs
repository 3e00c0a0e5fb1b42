//! Product identifiers.
//!
//! Product IDs are opaque to the cart. Older clients persisted them as JSON
//! integers, so deserialization accepts both strings and integers while
//! serialization always writes a string.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A product ID was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("product id must not be empty")]
pub struct EmptyProductId;

/// Opaque, stable identifier of a catalog product.
///
/// # Example
///
/// ```rust
/// # use rocket_cart_core::ProductId;
/// let from_str: ProductId = serde_json::from_str("\"P1\"").unwrap();
/// let from_int: ProductId = serde_json::from_str("7").unwrap();
///
/// assert_eq!(from_str.as_str(), "P1");
/// assert_eq!(from_int, ProductId::new("7").unwrap());
/// assert!(ProductId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    ///
    /// # Errors
    ///
    /// Returns `EmptyProductId` if `id` is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, EmptyProductId> {
        let id = id.into();
        if id.is_empty() {
            return Err(EmptyProductId);
        }
        Ok(Self(id))
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductId {
    type Err = EmptyProductId;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        Self::new(id)
    }
}

impl TryFrom<&str> for ProductId {
    type Error = EmptyProductId;

    fn try_from(id: &str) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl TryFrom<String> for ProductId {
    type Error = EmptyProductId;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ProductIdVisitor)
    }
}

struct ProductIdVisitor;

impl Visitor<'_> for ProductIdVisitor {
    type Value = ProductId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-empty string or integer product id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        ProductId::new(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        ProductId::new(v).map_err(|_| E::invalid_value(de::Unexpected::Str(""), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ProductId::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ProductId(v.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_string_and_integer() {
        let id: ProductId = serde_json::from_str("\"sku-42\"").unwrap();
        assert_eq!(id.as_str(), "sku-42");

        let id: ProductId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_serializes_as_string() {
        let id = ProductId::from(3_u64);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"3\"");
    }

    #[test]
    fn test_rejects_empty_and_non_scalar() {
        assert!(serde_json::from_str::<ProductId>("\"\"").is_err());
        assert!(serde_json::from_str::<ProductId>("null").is_err());
        assert!(serde_json::from_str::<ProductId>("{}").is_err());
        assert!(serde_json::from_str::<ProductId>("1.5").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductId::new("P1").unwrap().to_string(), "P1");
    }

    #[test]
    fn test_construction_rejects_empty() {
        assert_eq!(ProductId::new(""), Err(EmptyProductId));
        assert_eq!("".parse::<ProductId>(), Err(EmptyProductId));
        assert_eq!(ProductId::try_from(String::new()), Err(EmptyProductId));

        let id: ProductId = "sku-42".parse().unwrap();
        assert_eq!(id, ProductId::try_from("sku-42").unwrap());
    }
}
