//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ROCKETSHOES_API_URL` - Base URL of the stock/catalog API (default: `http://localhost:3333`)
//! - `ROCKETSHOES_STORAGE_DIR` - Directory holding the persisted cart (default: `.rocketshoes`)
//! - `ROCKETSHOES_LOCALE` - Language of user-facing messages, `pt-BR` or `en` (default: `pt-BR`)
//! - `ROCKETSHOES_CATALOG_CACHE_TTL_SECS` - Catalog entry cache TTL (default: 300)
//! - `ROCKETSHOES_CATALOG_CACHE_CAPACITY` - Catalog entry cache size (default: 1000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::messages::Locale;

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_DIR: &str = ".rocketshoes";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Stock and catalog API configuration
    pub api: ApiConfig,
    /// Directory for the file-backed cart store
    pub storage_dir: PathBuf,
    /// Language used for notifier messages
    pub locale: Locale,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "staging")
    pub sentry_environment: Option<String>,
}

/// Stock and catalog API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; `/stock/{id}` and `/products/{id}` are resolved against it
    pub base_url: Url,
    /// How long catalog entries stay cached (stock is never cached)
    pub catalog_cache_ttl: Duration,
    /// Maximum number of cached catalog entries
    pub catalog_cache_capacity: u64,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_dir = PathBuf::from(get_or_default(
            &lookup,
            "ROCKETSHOES_STORAGE_DIR",
            DEFAULT_STORAGE_DIR,
        ));
        let locale = get_or_default(&lookup, "ROCKETSHOES_LOCALE", "pt-BR")
            .parse::<Locale>()
            .map_err(|e| ConfigError::InvalidEnvVar("ROCKETSHOES_LOCALE".to_string(), e))?;

        Ok(Self {
            api: ApiConfig::from_lookup(&lookup)?,
            storage_dir,
            locale,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        })
    }
}

impl ApiConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = get_or_default(lookup, "ROCKETSHOES_API_URL", DEFAULT_API_URL);
        let base_url = parse_base_url(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("ROCKETSHOES_API_URL".to_string(), e))?;

        let ttl_secs = get_parsed(lookup, "ROCKETSHOES_CATALOG_CACHE_TTL_SECS", 300_u64)?;
        let catalog_cache_capacity =
            get_parsed(lookup, "ROCKETSHOES_CATALOG_CACHE_CAPACITY", 1000_u64)?;

        Ok(Self {
            base_url,
            catalog_cache_ttl: Duration::from_secs(ttl_secs),
            catalog_cache_capacity,
        })
    }

    /// Configuration pointing at `base_url` with default cache settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL cannot be parsed.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(&|key| (key == "ROCKETSHOES_API_URL").then(|| base_url.to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Get a variable parsed as `T`, falling back to `default` when unset.
fn get_parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

/// Parse an API base URL, normalizing it to end in `/` so relative joins
/// keep any path prefix (e.g. `https://host/api/`).
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CartConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.api.base_url.as_str(), "http://localhost:3333/");
        assert_eq!(config.api.catalog_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.api.catalog_cache_capacity, 1000);
        assert_eq!(config.storage_dir, PathBuf::from(".rocketshoes"));
        assert_eq!(config.locale, Locale::PtBr);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("ROCKETSHOES_API_URL", "https://shop.example.com/api"),
            ("ROCKETSHOES_STORAGE_DIR", "/tmp/cart"),
            ("ROCKETSHOES_LOCALE", "en"),
            ("ROCKETSHOES_CATALOG_CACHE_TTL_SECS", "60"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ]))
        .unwrap();

        assert_eq!(config.api.base_url.as_str(), "https://shop.example.com/api/");
        assert_eq!(config.api.catalog_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/cart"));
        assert_eq!(config.locale, Locale::En);
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_invalid_url() {
        let result = CartConfig::from_lookup(lookup_from(&[("ROCKETSHOES_API_URL", "not a url")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "ROCKETSHOES_API_URL"));

        let result = CartConfig::from_lookup(lookup_from(&[("ROCKETSHOES_API_URL", "ftp://host")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_number() {
        let result = CartConfig::from_lookup(lookup_from(&[(
            "ROCKETSHOES_CATALOG_CACHE_CAPACITY",
            "lots",
        )]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_invalid_locale() {
        let result = CartConfig::from_lookup(lookup_from(&[("ROCKETSHOES_LOCALE", "klingon")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(key, _)) if key == "ROCKETSHOES_LOCALE"));
    }

    #[test]
    fn test_with_base_url() {
        let api = ApiConfig::with_base_url("http://127.0.0.1:9000").unwrap();
        assert_eq!(api.base_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(api.catalog_cache_capacity, 1000);
    }
}
