//! Stock and catalog lookups.
//!
//! # Architecture
//!
//! - [`Catalog`] is the seam the cart engine depends on: one stock lookup and
//!   one catalog-entry lookup, each returning `Ok(None)` for a clean
//!   "not found" and `Err` for a failed request
//! - [`ApiClient`] talks to the REST API over `reqwest`
//! - [`InMemoryCatalog`] serves fixed data for offline use and tests
//!
//! Stock is never cached: every mutation sees the current quantity. Catalog
//! entries are cached by `ApiClient` (see `ApiConfig::catalog_cache_ttl`).
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` - `{ "id": 1, "amount": 3 }` or 404
//! - `GET /products/{id}` - product record or 404
//! - `GET /products` - full catalog

mod client;
mod memory;

use std::future::Future;

pub use client::ApiClient;
pub use memory::InMemoryCatalog;

use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when calling the stock/catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status other than 404.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// Source of stock quantities and catalog entries.
pub trait Catalog: Send + Sync {
    /// Current stock for a product, or `None` if there is no stock record.
    fn stock(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Option<Stock>, ApiError>> + Send;

    /// Catalog entry for a product, or `None` if the product does not exist.
    fn product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, ApiError>> + Send;
}
