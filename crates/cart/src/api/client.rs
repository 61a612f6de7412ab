//! REST client for the stock and catalog API.
//!
//! Uses `reqwest` for HTTP and caches catalog entries with `moka`.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use rocketshoes_core::{Product, ProductId, Stock};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, Catalog};
use crate::config::ApiConfig;

/// Maximum number of body characters kept in logs and error messages.
const BODY_EXCERPT_CHARS: usize = 200;

/// Client for the stock and catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and the catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    catalog_cache: Cache<ProductId, Product>,
}

impl ApiClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let catalog_cache = Cache::builder()
            .max_capacity(config.catalog_cache_capacity)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                catalog_cache,
            }),
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// GET a JSON resource; a 404 maps to `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        let url = self.inner.base_url.join(path)?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
            tracing::error!(
                status = %status,
                path,
                body = %excerpt,
                "Stock API returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: excerpt,
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path,
                    body = %body.chars().take(BODY_EXCERPT_CHARS).collect::<String>(),
                    "Failed to parse stock API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    /// Get current stock for a product. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_stock(&self, product_id: ProductId) -> Result<Option<Stock>, ApiError> {
        self.get_json(&format!("stock/{product_id}")).await
    }

    /// Get a product's catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Option<Product>, ApiError> {
        if let Some(product) = self.inner.catalog_cache.get(&product_id).await {
            debug!("Cache hit for product");
            return Ok(Some(product));
        }

        let product: Option<Product> = self.get_json(&format!("products/{product_id}")).await?;

        if let Some(product) = &product {
            self.inner
                .catalog_cache
                .insert(product_id, product.clone())
                .await;
        }

        Ok(product)
    }

    /// List the full catalog. Entries are added to the catalog cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let products: Vec<Product> = self.get_json("products").await?.unwrap_or_default();

        for product in &products {
            self.inner
                .catalog_cache
                .insert(product.id, product.clone())
                .await;
        }

        debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }
}

impl Catalog for ApiClient {
    async fn stock(&self, product_id: ProductId) -> Result<Option<Stock>, ApiError> {
        self.get_stock(product_id).await
    }

    async fn product(&self, product_id: ProductId) -> Result<Option<Product>, ApiError> {
        self.get_product(product_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_resolve_under_base_prefix() {
        let config = ApiConfig::with_base_url("https://shop.example.com/api").unwrap();
        let client = ApiClient::new(&config);

        let url = client.base_url().join("stock/3").unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/api/stock/3");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let config = ApiConfig::with_base_url("http://127.0.0.1:9").unwrap();
        let client = ApiClient::new(&config);

        let result = client.get_stock(ProductId::new(1)).await;
        assert!(matches!(result, Err(ApiError::Http(_))));
    }
}
