//! The cart collection and its invariants.
//!
//! A [`Cart`] is an ordered list of products, unique by ID, where every entry
//! holds at least one unit and the cart total fits in a [`Price`]. All
//! mutating methods keep those invariants, and
//! deserialization rejects input that breaks them so a corrupt snapshot can
//! never become a cart.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Price, Product, ProductId};

/// A mutation or snapshot that would break a cart invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartViolation {
    /// Two entries share the same product ID.
    #[error("duplicate cart entry for product {0}")]
    DuplicateProduct(ProductId),

    /// An entry would hold fewer than one unit.
    #[error("product {product_id} would have non-positive amount {amount}")]
    NonPositiveAmount { product_id: ProductId, amount: i64 },

    /// The product has no entry in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The cart total would not fit in a price.
    #[error("cart total overflows at product {0}")]
    TotalOverflow(ProductId),
}

/// Ordered, unique-by-ID collection of products with purchase quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Product>", into = "Vec<Product>")]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Look up an entry by product ID.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == product_id)
    }

    /// Whether the product has an entry.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products (the header badge count).
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all entry quantities.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0, |total: i64, p| total.saturating_add(p.amount))
    }

    /// Sum of all line prices.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(Product::subtotal).sum()
    }

    /// Append a new entry holding exactly one unit.
    ///
    /// # Errors
    ///
    /// Returns `CartViolation::DuplicateProduct` if the product is already in
    /// the cart, or `CartViolation::TotalOverflow` if its price would push the
    /// total out of range.
    pub fn insert_new(&mut self, product: Product) -> Result<(), CartViolation> {
        if self.contains(product.id) {
            return Err(CartViolation::DuplicateProduct(product.id));
        }
        self.check_total_with(product.id, product.price, 1)?;
        self.items.push(product.with_amount(1));
        Ok(())
    }

    /// Add one unit to an existing entry, returning the new amount.
    ///
    /// # Errors
    ///
    /// Returns `CartViolation::NotInCart` if the product has no entry, or
    /// `CartViolation::TotalOverflow` if the new amount is out of range.
    pub fn increment(&mut self, product_id: ProductId) -> Result<i64, CartViolation> {
        let (price, amount) = self
            .get(product_id)
            .map(|p| (p.price, p.amount))
            .ok_or(CartViolation::NotInCart(product_id))?;
        let amount = amount
            .checked_add(1)
            .ok_or(CartViolation::TotalOverflow(product_id))?;
        self.check_total_with(product_id, price, amount)?;

        self.entry_mut(product_id)?.amount = amount;
        Ok(amount)
    }

    /// Set the quantity of an existing entry.
    ///
    /// # Errors
    ///
    /// Returns `CartViolation::NonPositiveAmount` if `amount < 1`,
    /// `CartViolation::NotInCart` if the product has no entry, or
    /// `CartViolation::TotalOverflow` if the new line pushes the total out of
    /// range.
    pub fn set_amount(&mut self, product_id: ProductId, amount: i64) -> Result<(), CartViolation> {
        if amount < 1 {
            return Err(CartViolation::NonPositiveAmount { product_id, amount });
        }
        let price = self
            .get(product_id)
            .map(|p| p.price)
            .ok_or(CartViolation::NotInCart(product_id))?;
        self.check_total_with(product_id, price, amount)?;

        self.entry_mut(product_id)?.amount = amount;
        Ok(())
    }

    /// Remove an entry, returning it.
    ///
    /// # Errors
    ///
    /// Returns `CartViolation::NotInCart` if the product has no entry.
    pub fn remove(&mut self, product_id: ProductId) -> Result<Product, CartViolation> {
        let index = self
            .items
            .iter()
            .position(|p| p.id == product_id)
            .ok_or(CartViolation::NotInCart(product_id))?;
        Ok(self.items.remove(index))
    }

    /// Check that the total fits once `product_id` holds `amount` units at
    /// `price`.
    fn check_total_with(
        &self,
        product_id: ProductId,
        price: Price,
        amount: i64,
    ) -> Result<(), CartViolation> {
        let line = price
            .checked_times(amount)
            .ok_or(CartViolation::TotalOverflow(product_id))?;
        self.items
            .iter()
            .filter(|p| p.id != product_id)
            .try_fold(line, |total, p| {
                p.price
                    .checked_times(p.amount)
                    .and_then(|subtotal| total.checked_add(subtotal))
            })
            .map(|_| ())
            .ok_or(CartViolation::TotalOverflow(product_id))
    }

    fn entry_mut(&mut self, product_id: ProductId) -> Result<&mut Product, CartViolation> {
        self.items
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(CartViolation::NotInCart(product_id))
    }
}

impl TryFrom<Vec<Product>> for Cart {
    type Error = CartViolation;

    fn try_from(items: Vec<Product>) -> Result<Self, Self::Error> {
        for (i, product) in items.iter().enumerate() {
            if product.amount < 1 {
                return Err(CartViolation::NonPositiveAmount {
                    product_id: product.id,
                    amount: product.amount,
                });
            }
            if items.iter().skip(i + 1).any(|other| other.id == product.id) {
                return Err(CartViolation::DuplicateProduct(product.id));
            }
        }

        let mut total = Price::ZERO;
        for product in &items {
            total = product
                .price
                .checked_times(product.amount)
                .and_then(|subtotal| total.checked_add(subtotal))
                .ok_or(CartViolation::TotalOverflow(product.id))?;
        }
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<Product> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = core::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
