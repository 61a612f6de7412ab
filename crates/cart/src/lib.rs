//! RocketShoes cart library.
//!
//! A shopping cart that validates every change against live stock and keeps
//! a local snapshot in sync with the in-memory cart.
//!
//! # Architecture
//!
//! - [`engine::CartEngine`] - owns the cart; `add_product`, `remove_product`
//!   and `update_product_amount`
//! - [`context::CartContext`] - cloneable handle for presentation code
//! - [`api`] - stock and catalog lookups (`reqwest` client, in-memory catalog)
//! - [`store`] / [`snapshot`] - key-value storage and the persisted cart
//! - [`notifier`] / [`messages`] - user-facing failure messages
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{ApiClient, CartConfig, CartContext, CartEngine, FileStore, TracingNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let engine = CartEngine::new(
//!     ApiClient::new(&config.api),
//!     FileStore::open(&config.storage_dir)?,
//!     TracingNotifier,
//! )
//! .with_locale(config.locale);
//! let cart = CartContext::new(engine);
//!
//! cart.add_product(ProductId::new(1)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod messages;
pub mod notifier;
pub mod snapshot;
pub mod store;
pub mod view;

pub use api::{ApiClient, ApiError, Catalog, InMemoryCatalog};
pub use config::{ApiConfig, CartConfig, ConfigError};
pub use context::CartContext;
pub use engine::CartEngine;
pub use error::CartError;
pub use messages::Locale;
pub use notifier::{ChannelNotifier, Notifier, TracingNotifier};
pub use store::{FileStore, MemoryStore, Persister, StoreError};
pub use view::CartView;
