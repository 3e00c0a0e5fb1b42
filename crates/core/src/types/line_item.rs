//! Line items and their catalog display attributes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;
use super::price::Price;
use super::quantity::Quantity;

/// Keys owned by the line item encoding. Display attributes never carry them.
const RESERVED_KEYS: [&str; 2] = ["productId", "quantity"];

/// Catalog payload shown for a line item (name, price, image, ...).
///
/// The payload is copied verbatim from the catalog when the product is first
/// added and is never re-fetched afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayAttributes(Map<String, Value>);

impl DisplayAttributes {
    /// Wrap a catalog JSON object, dropping keys reserved by [`LineItem`].
    #[must_use]
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        for key in RESERVED_KEYS {
            map.remove(key);
        }
        Self(map)
    }

    /// Product title (`title`, falling back to `name`).
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.0
            .get("title")
            .or_else(|| self.0.get("name"))
            .and_then(Value::as_str)
    }

    /// Unit price, if the catalog provided a numeric one.
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        self.0.get("price").and_then(Price::from_json)
    }

    /// Image reference.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.0.get("image").and_then(Value::as_str)
    }

    /// Raw attribute lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for DisplayAttributes {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(map)
    }
}

/// One product entry in the cart.
///
/// Serialized as a flat JSON object: `productId`, the display attributes
/// inlined, then `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    product_id: ProductId,
    #[serde(flatten)]
    display: DisplayAttributes,
    quantity: Quantity,
}

impl LineItem {
    /// Create a line item.
    #[must_use]
    pub const fn new(product_id: ProductId, display: DisplayAttributes, quantity: Quantity) -> Self {
        Self {
            product_id,
            display,
            quantity,
        }
    }

    /// The product this line refers to.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Display attributes captured at add time.
    #[must_use]
    pub const fn display(&self) -> &DisplayAttributes {
        &self.display
    }

    /// Requested quantity.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Copy of this line with a different quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: Quantity) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}
