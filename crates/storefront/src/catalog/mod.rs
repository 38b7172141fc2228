//! Product catalog REST client.
//!
//! # Architecture
//!
//! - The catalog service is the source of truth - no local sync, direct API calls
//! - Every request carries `Content-Type: application/json` and `x-api-key`
//! - In-memory caching via `moka` for the unfiltered listing and product details
//! - [`ProductCatalog`] abstracts the client so the search controller and the
//!   product page loader can run against in-memory doubles
//!
//! # Example
//!
//! ```rust,ignore
//! use mobile_store_storefront::catalog::{CatalogClient, ProductCatalog};
//!
//! let client = CatalogClient::new(&config.catalog);
//!
//! let phones = client.list_products(Some("galaxy")).await?;
//! let detail = client.get_product_by_id(&phones[0].id).await?;
//! ```

mod cache;
mod client;

pub use client::{CatalogClient, product_url, products_url};

use async_trait::async_trait;
use mobile_store_core::{Phone, PhoneDetail, PhoneId};
use thiserror::Error;

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP 401: the API key was rejected.
    #[error("Invalid API key")]
    InvalidCredentials,

    /// Any other non-2xx response.
    #[error("API Error: {status} {status_text}")]
    Api { status: u16, status_text: String },

    /// No response at all (connection, DNS, TLS, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request could not be built, e.g. an API key that is not a valid
    /// header value. Nothing was sent.
    #[error("Invalid catalog request: {0}")]
    InvalidRequest(#[source] reqwest::Error),

    /// A status line arrived but the body could not be read.
    #[error("Failed to read catalog response body: {0}")]
    Body(#[source] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot produce a request URL.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CatalogError {
    /// Whether the failure happened below HTTP (no response received).
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Read access to the product catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// List products, filtered by `search` when it is non-empty.
    async fn list_products(&self, search: Option<&str>) -> Result<Vec<Phone>, CatalogError>;

    /// Fetch one product with options and similar products.
    async fn get_product_by_id(&self, id: &PhoneId) -> Result<PhoneDetail, CatalogError>;
}
