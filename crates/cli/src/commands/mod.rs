//! CLI command implementations.

pub mod cart;
pub mod catalog;

use rocketshoes_cart::{ApiClient, CartConfig, CartEngine, FileStore, StoreError, TracingNotifier};

/// Cart wired to the live API and the on-disk store.
pub type LiveCart = CartEngine<ApiClient, FileStore, TracingNotifier>;

/// Build the engine described by `config`.
///
/// # Errors
///
/// Returns `StoreError` if the storage directory cannot be created.
pub fn open_cart(config: &CartConfig) -> Result<LiveCart, StoreError> {
    let store = FileStore::open(&config.storage_dir)?;
    tracing::debug!(dir = %store.dir().display(), "Opened cart store");

    Ok(CartEngine::new(ApiClient::new(&config.api), store, TracingNotifier).with_locale(config.locale))
}
