//! Cart snapshot persistence.
//!
//! The whole cart is stored as one JSON array under [`CART_STORAGE_KEY`] and
//! overwritten on every commit. Reading never fails: a missing, unreadable or
//! invalid snapshot yields an empty cart.

use rocketshoes_core::Cart;
use tracing::{debug, warn};

use crate::store::{Persister, StoreError};

/// Storage key holding the cart snapshot.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Encode a cart as snapshot bytes.
///
/// # Errors
///
/// Returns `serde_json::Error` if a product's extra catalog fields cannot be
/// serialized.
pub fn encode(cart: &Cart) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(cart)
}

/// Decode snapshot bytes into a cart, enforcing cart invariants.
///
/// # Errors
///
/// Returns `serde_json::Error` for malformed JSON or a list that breaks cart
/// invariants (duplicate IDs, amounts below one, a total that overflows).
pub fn decode(bytes: &[u8]) -> Result<Cart, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Load the persisted cart, falling back to an empty cart.
pub fn load(store: &impl Persister) -> Cart {
    let bytes = match store.get(CART_STORAGE_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!("No persisted cart, starting empty");
            return Cart::new();
        }
        Err(e) => {
            warn!(error = %e, "Failed to read persisted cart, starting empty");
            return Cart::new();
        }
    };

    match decode(&bytes) {
        Ok(cart) => {
            debug!(items = cart.item_count(), "Loaded persisted cart");
            cart
        }
        Err(e) => {
            warn!(error = %e, "Discarding invalid cart snapshot");
            Cart::new()
        }
    }
}

/// Overwrite the persisted snapshot with `cart`.
///
/// # Errors
///
/// Returns `StoreError` if encoding or the write fails.
pub fn commit(store: &impl Persister, cart: &Cart) -> Result<(), StoreError> {
    let bytes = encode(cart)
        .map_err(|e| StoreError::Unavailable(format!("failed to encode cart: {e}")))?;
    store.put(CART_STORAGE_KEY, &bytes)?;
    debug!(items = cart.item_count(), bytes = bytes.len(), "Committed cart snapshot");
    Ok(())
}

/// Remove the persisted snapshot.
///
/// # Errors
///
/// Returns `StoreError` if the backend fails.
pub fn discard(store: &impl Persister) -> Result<(), StoreError> {
    store.delete(CART_STORAGE_KEY)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::{Price, Product, ProductId};

    use super::*;
    use crate::store::MemoryStore;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.insert_new(Product::new(
            ProductId::new(2),
            "Tênis VR Caminhada Confortável",
            Price::from_cents(13990),
            "https://example.com/2.jpg",
        ))
        .unwrap();
        cart.insert_new(Product::new(
            ProductId::new(1),
            "Tênis de Caminhada Leve",
            Price::from_cents(17990),
            "https://example.com/1.jpg",
        ))
        .unwrap();
        cart.set_amount(ProductId::new(2), 4).unwrap();
        cart
    }

    #[test]
    fn test_commit_then_load_reproduces_cart() {
        let store = MemoryStore::new();
        let cart = sample_cart();

        commit(&store, &cart).unwrap();
        assert_eq!(load(&store), cart);
    }

    #[test]
    fn test_load_missing_snapshot_is_empty() {
        assert!(load(&MemoryStore::new()).is_empty());
    }

    #[test]
    fn test_load_corrupt_snapshot_is_empty() {
        let store = MemoryStore::new();
        store.put(CART_STORAGE_KEY, b"{not json").unwrap();
        assert!(load(&store).is_empty());

        store
            .put(CART_STORAGE_KEY, br#"[{"id":1,"title":"a","price":1,"amount":0}]"#)
            .unwrap();
        assert!(load(&store).is_empty());
    }

    #[test]
    fn test_load_overflowing_snapshot_is_empty() {
        let store = MemoryStore::new();
        store
            .put(
                CART_STORAGE_KEY,
                br#"[{"id":1,"title":"a","price":"100000000000","amount":9223372036854775807}]"#,
            )
            .unwrap();
        assert!(load(&store).is_empty());
    }

    #[test]
    fn test_snapshot_reads_numeric_prices() {
        // Prices written as JSON numbers by the web client
        let bytes = br#"[{"id":1,"title":"Tenis","price":179.9,"image":"a.jpg","amount":2}]"#;
        let cart = decode(bytes).unwrap();
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().price, Price::from_cents(17990));
    }

    #[test]
    fn test_discard() {
        let store = MemoryStore::new();
        commit(&store, &sample_cart()).unwrap();
        discard(&store).unwrap();
        assert!(store.get(CART_STORAGE_KEY).unwrap().is_none());
    }
}
