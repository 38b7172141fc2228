//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MOBILE_STORE_API_URL` - Base URL of the product catalog service
//! - `MOBILE_STORE_API_KEY` - API key sent as `x-api-key` on every request
//!
//! ## Optional
//! - `MOBILE_STORE_DATA_DIR` - Directory for the persisted cart (default: .mobile-store)
//! - `MOBILE_STORE_SEARCH_DEBOUNCE_MS` - Search quiet period (default: 300)
//! - `MOBILE_STORE_CACHE_TTL_SECS` - Product cache lifetime (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_DATA_DIR: &str = ".mobile-store";
const DEFAULT_DEBOUNCE_MS: &str = "300";
const DEFAULT_CACHE_TTL_SECS: &str = "300";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog service connection settings
    pub catalog: CatalogConfig,
    /// Directory backing the file key-value store
    pub data_dir: PathBuf,
    /// Quiet period before a search is dispatched
    pub search_debounce: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Catalog service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL, with or without trailing slash
    pub base_url: String,
    /// API key for the `x-api-key` header
    pub api_key: SecretString,
    /// Lifetime of cached product responses
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog = CatalogConfig::from_env()?;
        let data_dir = PathBuf::from(get_env_or_default("MOBILE_STORE_DATA_DIR", DEFAULT_DATA_DIR));
        let search_debounce = Duration::from_millis(parse_env_or_default(
            "MOBILE_STORE_SEARCH_DEBOUNCE_MS",
            DEFAULT_DEBOUNCE_MS,
        )?);
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            catalog,
            data_dir,
            search_debounce,
            sentry_dsn,
        })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_required_env("MOBILE_STORE_API_URL")?,
            api_key: get_validated_secret("MOBILE_STORE_API_KEY")?,
            cache_ttl: Duration::from_secs(parse_env_or_default(
                "MOBILE_STORE_CACHE_TTL_SECS",
                DEFAULT_CACHE_TTL_SECS,
            )?),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required, non-empty environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a numeric environment variable, falling back to `default`.
fn parse_env_or_default(key: &str, default: &str) -> Result<u64, ConfigError> {
    get_env_or_default(key, default)
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a secret is not a placeholder.
fn validate_secret_strength(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.expose_secret().to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let secret = SecretString::from(get_required_env(key)?);
    validate_secret_strength(&secret, key)?;
    Ok(secret)
}
