//! The cart engine: owns the cart and applies stock-validated mutations.
//!
//! Each mutation reads the current cart at entry, validates against fresh
//! stock, builds the new cart, then commits it: the snapshot is written first
//! and only then is the new cart published. Any failure before the publish
//! leaves both the published cart and the snapshot untouched.
//!
//! Mutations are not serialized. Two overlapping `add_product` calls for the
//! same product both start from the same cart, so one increment can be lost.

use rocketshoes_core::{Cart, CartViolation, ProductId};
use tokio::sync::watch;
use tracing::{debug, error, instrument, warn};

use crate::api::Catalog;
use crate::error::CartError;
use crate::messages::{self, Locale, Operation};
use crate::notifier::Notifier;
use crate::snapshot;
use crate::store::Persister;

/// Authoritative cart state plus its collaborators.
pub struct CartEngine<C, S, N> {
    catalog: C,
    store: S,
    notifier: N,
    locale: Locale,
    state: watch::Sender<Cart>,
}

impl<C, S, N> CartEngine<C, S, N>
where
    C: Catalog,
    S: Persister,
    N: Notifier,
{
    /// Create an engine, restoring the cart from `store` (empty if absent or
    /// invalid).
    pub fn new(catalog: C, store: S, notifier: N) -> Self {
        let cart = snapshot::load(&store);
        let (state, _) = watch::channel(cart);

        Self {
            catalog,
            store,
            notifier,
            locale: Locale::default(),
            state,
        }
    }

    /// Set the language of notifier messages.
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Add one unit of a product, appending it if it is not in the cart yet.
    ///
    /// Failures are also reported to the notifier.
    ///
    /// # Errors
    ///
    /// - `StockUnavailable` if there is no stock record or no units in stock
    /// - `StockExceeded` if the cart already holds every unit in stock
    /// - `ProductNotFound` if a new product has no catalog entry
    /// - `Transport` / `Storage` for infrastructure failures
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.try_add(product_id).await;
        self.settle(Operation::Add, result)
    }

    /// Remove a product's entry.
    ///
    /// Failures are also reported to the notifier.
    ///
    /// # Errors
    ///
    /// - `ProductNotInCart` if the product has no entry
    /// - `Storage` if the snapshot cannot be written
    #[instrument(skip(self))]
    pub fn remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = self.cart();
        let result = cart
            .remove(product_id)
            .map(|_| cart)
            .map_err(|_| CartError::ProductNotInCart(product_id));
        self.settle(Operation::Remove, result)
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// Failures are also reported to the notifier.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `ProductNotInCart` if the product has no entry
    /// - `StockUnavailable` if there is no stock record
    /// - `StockExceeded` if `amount` is more than the available stock
    /// - `Transport` / `Storage` for infrastructure failures
    #[instrument(skip(self))]
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<(), CartError> {
        let result = self.try_update_amount(product_id, amount).await;
        self.settle(Operation::UpdateAmount, result)
    }

    async fn try_add(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let mut cart = self.cart();

        let available = match self.catalog.stock(product_id).await? {
            Some(stock) if stock.is_available() => stock.amount,
            Some(stock) => {
                return Err(CartError::StockUnavailable {
                    product_id,
                    available: Some(stock.amount),
                });
            }
            None => {
                return Err(CartError::StockUnavailable {
                    product_id,
                    available: None,
                });
            }
        };

        if let Some(entry) = cart.get(product_id) {
            let requested = entry.amount.saturating_add(1);
            if entry.amount >= available {
                return Err(CartError::StockExceeded {
                    product_id,
                    requested,
                    available,
                });
            }
            let amount = cart
                .increment(product_id)
                .map_err(|v| rejected(product_id, requested, v))?;
            debug!(amount, available, "Incremented cart entry");
            return Ok(cart);
        }

        let product = self
            .catalog
            .product(product_id)
            .await?
            .filter(|product| product.id == product_id)
            .ok_or(CartError::ProductNotFound(product_id))?;

        cart.insert_new(product)
            .map_err(|v| rejected(product_id, 1, v))?;
        debug!(available, "Added new cart entry");
        Ok(cart)
    }

    async fn try_update_amount(&self, product_id: ProductId, amount: i64) -> Result<Cart, CartError> {
        let mut cart = self.cart();

        if amount <= 0 {
            return Err(CartError::InvalidAmount { product_id, amount });
        }
        if !cart.contains(product_id) {
            return Err(CartError::ProductNotInCart(product_id));
        }

        let stock = self
            .catalog
            .stock(product_id)
            .await?
            .ok_or(CartError::StockUnavailable {
                product_id,
                available: None,
            })?;

        if amount > stock.amount {
            return Err(CartError::StockExceeded {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        cart.set_amount(product_id, amount)
            .map_err(|v| rejected(product_id, amount, v))?;
        Ok(cart)
    }

    /// Commit a successful mutation, or report a failed one.
    fn settle(&self, operation: Operation, result: Result<Cart, CartError>) -> Result<(), CartError> {
        let outcome = result.and_then(|cart| self.commit(cart));

        if let Err(e) = &outcome {
            if e.is_infrastructure() {
                error!(%operation, error = %e, "Cart mutation failed");
            } else {
                warn!(%operation, error = %e, "Cart mutation rejected");
            }
            self.notifier
                .notify(messages::render(operation, e, self.locale));
        }

        outcome
    }

    /// Persist `cart`, then publish it as the current state.
    fn commit(&self, cart: Cart) -> Result<(), CartError> {
        snapshot::commit(&self.store, &cart)?;
        self.state.send_replace(cart);
        Ok(())
    }
}

/// Error for a cart mutation that `Cart` refused after validation passed.
fn rejected(product_id: ProductId, amount: i64, violation: CartViolation) -> CartError {
    match violation {
        CartViolation::NotInCart(_) => CartError::ProductNotInCart(product_id),
        CartViolation::NonPositiveAmount { .. } | CartViolation::TotalOverflow(_) => {
            CartError::InvalidAmount { product_id, amount }
        }
        // Inserts only happen when the entry is absent from this copy
        CartViolation::DuplicateProduct(_) => CartError::ProductNotFound(product_id),
    }
}
