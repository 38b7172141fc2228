//! Catalog API client implementation.
//!
//! Uses `reqwest` for HTTP and parses bodies with `serde_json`.
//! Caches the unfiltered listing and product details using `moka`.

use std::sync::Arc;

use async_trait::async_trait;
use mobile_store_core::{Phone, PhoneDetail, PhoneId};
use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::{CatalogError, ProductCatalog};
use crate::config::CatalogConfig;

const API_KEY_HEADER: &str = "x-api-key";
const MAX_CACHE_ENTRIES: u64 = 1000;
const LOGGED_BODY_CHARS: usize = 500;

// =============================================================================
// URL Construction
// =============================================================================

/// Base URL without trailing slashes, so joined paths never contain `//`.
fn normalize_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// URL of the product listing, with `search` appended only when non-empty.
///
/// # Errors
///
/// Returns an error if the base URL is not a valid absolute URL.
pub fn products_url(base_url: &str, search: Option<&str>) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("{}/products", normalize_base(base_url)))?;
    if let Some(search) = search.filter(|s| !s.is_empty()) {
        url.query_pairs_mut().append_pair("search", search);
    }
    Ok(url)
}

/// URL of a single product.
///
/// # Errors
///
/// Returns an error if the base URL is not a valid absolute URL.
pub fn product_url(base_url: &str, id: &PhoneId) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
        "{}/products/{}",
        normalize_base(base_url),
        urlencoding::encode(id.as_str())
    ))
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the product catalog REST API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_CACHE_ENTRIES)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                api_key: config.api_key.clone(),
                cache,
            }),
        }
    }

    /// Perform an authenticated GET and decode the JSON body.
    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let request = self
            .inner
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, self.inner.api_key.expose_secret())
            .build()
            .map_err(CatalogError::InvalidRequest)?;

        let response = self.inner.client.execute(request).await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::InvalidCredentials);
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await.map_err(CatalogError::Body)?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(LOGGED_BODY_CHARS).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    /// List products, optionally filtered by a search string.
    ///
    /// Only the unfiltered listing is cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, search: Option<&str>) -> Result<Vec<Phone>, CatalogError> {
        let search = search.filter(|s| !s.is_empty());

        if search.is_none()
            && let Some(CacheValue::Products(products)) =
                self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for product listing");
            return Ok(products);
        }

        let url = products_url(&self.inner.base_url, search)?;
        let products: Vec<Phone> = self.fetch(url).await?;

        if search.is_none() {
            self.inner
                .cache
                .insert(CacheKey::Products, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Get a product's full detail record.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product_by_id(&self, id: &PhoneId) -> Result<PhoneDetail, CatalogError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = product_url(&self.inner.base_url, id)?;
        let product: PhoneDetail = self.fetch(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }
}

#[async_trait]
impl ProductCatalog for CatalogClient {
    async fn list_products(&self, search: Option<&str>) -> Result<Vec<Phone>, CatalogError> {
        Self::list_products(self, search).await
    }

    async fn get_product_by_id(&self, id: &PhoneId) -> Result<PhoneDetail, CatalogError> {
        Self::get_product_by_id(self, id).await
    }
}
