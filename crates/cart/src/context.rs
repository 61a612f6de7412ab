//! Handle given to presentation code.
//!
//! A [`CartContext`] exposes the current cart, change notifications and the
//! three mutations. The catalog client, store and notifier stay inside the
//! engine.

use std::sync::Arc;

use rocketshoes_core::{Cart, ProductId};
use tokio::sync::watch;

use crate::api::Catalog;
use crate::engine::CartEngine;
use crate::error::CartError;
use crate::notifier::Notifier;
use crate::store::Persister;

/// Cheaply cloneable view of a cart engine.
pub struct CartContext<C, S, N> {
    engine: Arc<CartEngine<C, S, N>>,
}

impl<C, S, N> Clone for CartContext<C, S, N> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<C, S, N> CartContext<C, S, N>
where
    C: Catalog,
    S: Persister,
    N: Notifier,
{
    /// Wrap an engine.
    #[must_use]
    pub fn new(engine: CartEngine<C, S, N>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.engine.cart()
    }

    /// Receiver that observes every published cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.engine.subscribe()
    }

    /// See [`CartEngine::add_product`].
    ///
    /// # Errors
    ///
    /// Returns the `CartError` that was also sent to the notifier.
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        self.engine.add_product(product_id).await
    }

    /// See [`CartEngine::remove_product`].
    ///
    /// # Errors
    ///
    /// Returns the `CartError` that was also sent to the notifier.
    pub fn remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        self.engine.remove_product(product_id)
    }

    /// See [`CartEngine::update_product_amount`].
    ///
    /// # Errors
    ///
    /// Returns the `CartError` that was also sent to the notifier.
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<(), CartError> {
        self.engine.update_product_amount(product_id, amount).await
    }
}

impl<C, S, N> From<CartEngine<C, S, N>> for CartContext<C, S, N>
where
    C: Catalog,
    S: Persister,
    N: Notifier,
{
    fn from(engine: CartEngine<C, S, N>) -> Self {
        Self::new(engine)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::{Price, Product};

    use super::*;
    use crate::api::InMemoryCatalog;
    use crate::notifier::TracingNotifier;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_clones_share_state() {
        let id = ProductId::new(1);
        let catalog = InMemoryCatalog::new()
            .with_product(Product::new(id, "Tênis", Price::from_cents(100), ""), 3);
        let context = CartContext::new(CartEngine::new(catalog, MemoryStore::new(), TracingNotifier));
        let other = context.clone();
        let mut receiver = other.subscribe();

        context.add_product(id).await.unwrap();
        other.update_product_amount(id, 3).await.unwrap();

        assert_eq!(context.cart().get(id).unwrap().amount, 3);
        assert_eq!(receiver.borrow_and_update().get(id).unwrap().amount, 3);

        other.remove_product(id).unwrap();
        assert!(context.cart().is_empty());
    }
}
