//! Catalog products and stock records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Price, ProductId};

/// A catalog product, optionally carrying the quantity held in a cart.
///
/// Catalog records do not include `amount`; it defaults to 0 until the
/// product is placed in a cart. Catalog fields the cart does not interpret
/// are kept in `extra` so they survive a round-trip through the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    /// Quantity held in the cart.
    #[serde(default)]
    pub amount: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a catalog product with no quantity and no extra fields.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: Price, image: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
            amount: 0,
            extra: Map::new(),
        }
    }

    /// Return this product with the given cart quantity.
    #[must_use]
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    /// Line price: unit price times the quantity in the cart.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.amount)
    }
}

/// Quantity of a product currently available for purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: i64,
}

impl Stock {
    /// Whether at least one unit can be sold.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.amount > 0
    }
}
