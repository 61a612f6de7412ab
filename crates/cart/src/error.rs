//! Cart mutation errors.
//!
//! Every mutation returns `Result<(), CartError>`. The same error is also
//! rendered into a user-facing message (see [`crate::messages`]) and handed to
//! the notifier, so UI callers can ignore the result while programmatic
//! callers can still tell success from failure.

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::api::ApiError;
use crate::store::StoreError;

/// Why a cart mutation was rejected. The cart is unchanged in every case.
#[derive(Debug, Error)]
pub enum CartError {
    /// Catalog lookup for a new product returned nothing.
    #[error("Product {0} not found in catalog")]
    ProductNotFound(ProductId),

    /// No stock record, or no units available (`available` is the reported
    /// quantity when a record exists).
    #[error("Product {product_id} is unavailable (stock: {})", format_stock(*available))]
    StockUnavailable {
        product_id: ProductId,
        available: Option<i64>,
    },

    /// The resulting quantity would exceed available stock.
    #[error("Requested {requested} of product {product_id}, only {available} in stock")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Remove or update targeted a product that has no cart entry.
    #[error("Product {0} is not in the cart")]
    ProductNotInCart(ProductId),

    /// Update requested a non-positive quantity.
    #[error("Invalid amount {amount} for product {product_id}")]
    InvalidAmount { product_id: ProductId, amount: i64 },

    /// The stock or catalog request itself failed.
    #[error("Transport error: {0}")]
    Transport(#[from] ApiError),

    /// The cart snapshot could not be written.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl CartError {
    /// Whether the failure came from infrastructure rather than validation.
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Storage(_))
    }
}

fn format_stock(available: Option<i64>) -> String {
    available.map_or_else(|| "no record".to_string(), |amount| amount.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let id = ProductId::new(3);

        assert_eq!(
            CartError::ProductNotFound(id).to_string(),
            "Product 3 not found in catalog"
        );
        assert_eq!(
            CartError::StockUnavailable {
                product_id: id,
                available: None
            }
            .to_string(),
            "Product 3 is unavailable (stock: no record)"
        );
        assert_eq!(
            CartError::StockUnavailable {
                product_id: id,
                available: Some(0)
            }
            .to_string(),
            "Product 3 is unavailable (stock: 0)"
        );
        assert_eq!(
            CartError::StockExceeded {
                product_id: id,
                requested: 6,
                available: 5
            }
            .to_string(),
            "Requested 6 of product 3, only 5 in stock"
        );
    }

    #[test]
    fn test_infrastructure_classification() {
        assert!(CartError::Storage(StoreError::Unavailable("disk full".to_string())).is_infrastructure());
        assert!(!CartError::ProductNotInCart(ProductId::new(1)).is_infrastructure());
    }
}
