//! Integration test support for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `api_client` - `ApiClient` against a fake stock API over real HTTP
//! - `cart_scenarios` - end-to-end cart flows with the on-disk store
//!
//! [`FakeStockApi`] serves `/stock/{id}`, `/products/{id}` and `/products`
//! from an `axum` router bound to an ephemeral localhost port.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_cart::{ApiClient, ApiConfig};
use rocketshoes_core::{Price, Product, ProductId};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// How the fake API answers requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Serve stored data.
    #[default]
    Normal,
    /// Answer every request with 500.
    Failing,
    /// Answer every request with 429 and `Retry-After: 30`.
    RateLimited,
    /// Answer every request with 200 and a non-JSON body.
    Garbage,
}

#[derive(Default)]
struct ApiState {
    products: RwLock<BTreeMap<i32, Value>>,
    stock: RwLock<BTreeMap<i32, i64>>,
    mode: Mutex<Mode>,
    stock_hits: AtomicUsize,
    product_hits: AtomicUsize,
}

/// A stock/catalog API running in the test process.
pub struct FakeStockApi {
    addr: SocketAddr,
    state: Arc<ApiState>,
    server: JoinHandle<()>,
}

impl FakeStockApi {
    /// Start a server on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = Arc::new(ApiState::default());

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products", get(products))
            .route("/products/{id}", get(product))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake stock API");
        let addr = listener.local_addr().expect("fake stock API address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake stock API server");
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Start a server serving the standard shoe catalog.
    pub async fn with_shoes() -> Self {
        let api = Self::spawn().await;
        for (id, title, cents, stock) in [
            (1, "Tênis de Caminhada Leve Confortável", 17990, 3),
            (2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 13990, 5),
            (3, "Tênis Adidas Duramo Lite 2.0", 21990, 2),
        ] {
            api.put_product(shoe(id, title, cents), stock);
        }
        api
    }

    /// Base URL of the server.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configured for this server.
    ///
    /// # Panics
    ///
    /// Panics if the base URL is rejected.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        let config = ApiConfig::with_base_url(&self.base_url()).expect("valid fake API URL");
        ApiClient::new(&config)
    }

    /// Serve a product with the given stock.
    ///
    /// # Panics
    ///
    /// Panics if the product cannot be encoded.
    pub fn put_product(&self, product: Product, stock: i64) {
        let id = product.id.as_i32();
        let record = serde_json::to_value(&product).expect("encode product");
        self.state.products.write().expect("products lock").insert(id, record);
        self.set_stock(product.id, stock);
    }

    /// Serve a raw JSON catalog record.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn put_raw_product(&self, id: i32, record: Value) {
        self.state.products.write().expect("products lock").insert(id, record);
    }

    /// Set (or create) the stock record for a product.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn set_stock(&self, product_id: ProductId, amount: i64) {
        self.state
            .stock
            .write()
            .expect("stock lock")
            .insert(product_id.as_i32(), amount);
    }

    /// Remove the stock record for a product.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn remove_stock(&self, product_id: ProductId) {
        self.state
            .stock
            .write()
            .expect("stock lock")
            .remove(&product_id.as_i32());
    }

    /// Change how requests are answered.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn set_mode(&self, mode: Mode) {
        *self.state.mode.lock().expect("mode lock") = mode;
    }

    /// Number of `/stock/{id}` requests received.
    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.state.stock_hits.load(Ordering::SeqCst)
    }

    /// Number of `/products/{id}` requests received.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }
}

impl Drop for FakeStockApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A catalog shoe with no cart quantity.
#[must_use]
pub fn shoe(id: i32, title: &str, cents: i64) -> Product {
    Product::new(
        ProductId::new(id),
        title,
        Price::from_cents(cents),
        format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
    )
}

// =============================================================================
// Handlers
// =============================================================================

fn mode_override(state: &ApiState) -> Option<Response> {
    let mode = state.mode.lock().map_or(Mode::Failing, |m| *m);
    match mode {
        Mode::Normal => None,
        Mode::Failing => Some((StatusCode::INTERNAL_SERVER_ERROR, "database offline").into_response()),
        Mode::RateLimited => Some(
            (
                StatusCode::TOO_MANY_REQUESTS,
                [("Retry-After", "30")],
                "slow down",
            )
                .into_response(),
        ),
        Mode::Garbage => Some((StatusCode::OK, "<html>maintenance</html>").into_response()),
    }
}

async fn stock(State(state): State<Arc<ApiState>>, Path(id): Path<i32>) -> Response {
    state.stock_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = mode_override(&state) {
        return response;
    }

    let amount = state.stock.read().ok().and_then(|s| s.get(&id).copied());
    match amount {
        Some(amount) => Json(json!({ "id": id, "amount": amount })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn product(State(state): State<Arc<ApiState>>, Path(id): Path<i32>) -> Response {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = mode_override(&state) {
        return response;
    }

    let record = state.products.read().ok().and_then(|p| p.get(&id).cloned());
    match record {
        Some(record) => Json(record).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn products(State(state): State<Arc<ApiState>>) -> Response {
    if let Some(response) = mode_override(&state) {
        return response;
    }

    let records: Vec<Value> = state
        .products
        .read()
        .map(|p| p.values().cloned().collect())
        .unwrap_or_default();
    Json(records).into_response()
}
