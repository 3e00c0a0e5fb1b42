//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CART_API_URL` - Base URL of the catalog/stock service (e.g., `http://localhost:3333/`)
//!
//! ## Optional
//! - `CART_API_TOKEN` - Bearer token sent to the catalog/stock service
//! - `CART_API_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `CART_CATALOG_CACHE_TTL_SECS` - Product lookup cache TTL in seconds (default: 300)
//! - `CART_STORAGE_PATH` - JSON key-value file (default: `.rocket-cart/storage.json`)
//! - `CART_STORAGE_KEY` - Key the cart is stored under (default: `@RocketShoes:cart`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::storage::DEFAULT_STORAGE_KEY;

const DEFAULT_STORAGE_PATH: &str = ".rocket-cart/storage.json";
const DEFAULT_TIMEOUT_SECS: &str = "10";
const DEFAULT_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Catalog/stock service configuration
    pub api: CatalogApiConfig,
    /// File backing the persistent key-value store
    pub storage_path: PathBuf,
    /// Key the serialized cart is stored under
    pub storage_key: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Catalog/stock HTTP service configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct CatalogApiConfig {
    /// Base URL, always ending in `/`
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long product lookups stay cached
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for CatalogApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl CatalogApiConfig {
    /// Configuration with default timeout and cache TTL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not a valid base URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("CART_API_URL", base_url)?,
            token: None,
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
        })
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);

        let api = CatalogApiConfig {
            base_url: parse_base_url("CART_API_URL", &vars.required("CART_API_URL")?)?,
            token: vars.optional("CART_API_TOKEN").map(SecretString::from),
            timeout: vars.seconds("CART_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            cache_ttl: vars.seconds("CART_CATALOG_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
        };

        Ok(Self {
            api,
            storage_path: PathBuf::from(vars.or_default("CART_STORAGE_PATH", DEFAULT_STORAGE_PATH)),
            storage_key: vars.or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY),
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a duration given in whole seconds.
    fn seconds(&self, key: &str, default: &str) -> Result<Duration, ConfigError> {
        self.or_default(key, default)
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Parse a base URL, making sure relative joins keep its last path segment.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "URL cannot be used as a base".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
