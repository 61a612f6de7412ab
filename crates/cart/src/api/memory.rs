//! Fixed in-process catalog.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use rocketshoes_core::{Product, ProductId, Stock};

use super::{ApiError, Catalog};

/// In-memory stock and catalog data.
///
/// Clones share the same data, so stock can be changed after the catalog has
/// been handed to an engine. Lookups can be switched to fail to simulate an
/// unreachable API.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    products: RwLock<HashMap<ProductId, Product>>,
    stock: RwLock<HashMap<ProductId, i64>>,
    unreachable: AtomicBool,
    stock_lookups: AtomicUsize,
    product_lookups: AtomicUsize,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with the given stock quantity.
    #[must_use]
    pub fn with_product(self, product: Product, stock: i64) -> Self {
        self.set_stock(product.id, stock);
        if let Ok(mut products) = self.inner.products.write() {
            products.insert(product.id, product);
        }
        self
    }

    /// Set (or create) the stock record for a product.
    pub fn set_stock(&self, product_id: ProductId, amount: i64) {
        if let Ok(mut stock) = self.inner.stock.write() {
            stock.insert(product_id, amount);
        }
    }

    /// Remove the stock record for a product.
    pub fn remove_stock(&self, product_id: ProductId) {
        if let Ok(mut stock) = self.inner.stock.write() {
            stock.remove(&product_id);
        }
    }

    /// Make every lookup fail with a 503 until switched back.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of stock lookups served so far.
    #[must_use]
    pub fn stock_lookups(&self) -> usize {
        self.inner.stock_lookups.load(Ordering::SeqCst)
    }

    /// Number of catalog-entry lookups served so far.
    #[must_use]
    pub fn product_lookups(&self) -> usize {
        self.inner.product_lookups.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), ApiError> {
        if self.inner.unreachable.load(Ordering::SeqCst) {
            return Err(ApiError::Api {
                status: 503,
                message: "catalog unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn poisoned() -> ApiError {
        ApiError::Api {
            status: 500,
            message: "in-memory catalog lock poisoned".to_string(),
        }
    }
}

impl Catalog for InMemoryCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<Option<Stock>, ApiError> {
        self.inner.stock_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;

        let stock = self.inner.stock.read().map_err(|_| Self::poisoned())?;
        Ok(stock
            .get(&product_id)
            .map(|&amount| Stock { id: product_id, amount }))
    }

    async fn product(&self, product_id: ProductId) -> Result<Option<Product>, ApiError> {
        self.inner.product_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;

        let products = self.inner.products.read().map_err(|_| Self::poisoned())?;
        Ok(products.get(&product_id).cloned())
    }
}
