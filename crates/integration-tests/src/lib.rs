//! Integration tests for Mobile Store.
//!
//! The tests run the real [`CatalogClient`] against [`MockCatalog`], an axum
//! server bound to an ephemeral local port that records every request.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mobile-store-integration-tests
//! ```
//!
//! [`CatalogClient`]: mobile_store_storefront::catalog::CatalogClient

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use mobile_store_core::{Phone, PhoneDetail};
use mobile_store_storefront::config::CatalogConfig;
use secrecy::SecretString;
use serde_json::json;
use tokio::task::JoinHandle;

/// API key the mock expects.
pub const TEST_API_KEY: &str = "mstore-test-7f3c9a1e5b2d";

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub search: Option<String>,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Default)]
struct MockState {
    products: Vec<Phone>,
    details: HashMap<String, PhoneDetail>,
    forced_status: Option<StatusCode>,
    forced_body: Option<String>,
    requests: Vec<RecordedRequest>,
}

type SharedState = Arc<Mutex<MockState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock catalog service.
///
/// Serves `GET /api/products[?search=]` and `GET /api/products/{id}`. Search
/// matches brand or name, ignoring case. Stops when dropped.
pub struct MockCatalog {
    addr: SocketAddr,
    state: SharedState,
    server: JoinHandle<()>,
}

impl MockCatalog {
    /// Start a server holding `products` and `details`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(products: Vec<Phone>, details: Vec<PhoneDetail>) -> Self {
        let state: SharedState = Arc::new(Mutex::new(MockState {
            products,
            details: details
                .into_iter()
                .map(|d| (d.id.to_string(), d))
                .collect(),
            ..MockState::default()
        }));

        let app = Router::new()
            .route("/api/products", get(list_products))
            .route("/api/products/{id}", get(get_product))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind mock catalog");
        let addr = listener.local_addr().expect("Mock catalog has no address");

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                panic!("Mock catalog server error: {e}");
            }
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL of the API, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client configuration pointing at this server.
    #[must_use]
    pub fn config(&self) -> CatalogConfig {
        catalog_config(&self.base_url())
    }

    /// Answer every request with `status` from now on.
    pub fn force_status(&self, status: StatusCode) {
        lock(&self.state).forced_status = Some(status);
    }

    /// Answer every request with `200 OK` and `body` from now on.
    pub fn force_body(&self, body: &str) {
        lock(&self.state).forced_body = Some(body.to_string());
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }
}

impl Drop for MockCatalog {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Client configuration for `base_url` with the test key and a long cache TTL.
#[must_use]
pub fn catalog_config(base_url: &str) -> CatalogConfig {
    CatalogConfig {
        base_url: base_url.to_string(),
        api_key: SecretString::from(TEST_API_KEY),
        cache_ttl: Duration::from_secs(300),
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Record the request; returns the forced response, if one is configured.
fn record(
    state: &SharedState,
    uri: &Uri,
    headers: &HeaderMap,
    search: Option<String>,
) -> Option<Response> {
    let mut state = lock(state);
    state.requests.push(RecordedRequest {
        path: uri.path().to_string(),
        search,
        api_key: header(headers, "x-api-key"),
        content_type: header(headers, CONTENT_TYPE.as_str()),
    });

    if let Some(status) = state.forced_status {
        return Some((status, Json(json!({ "error": "forced" }))).into_response());
    }
    if let Some(body) = &state.forced_body {
        return Some((StatusCode::OK, body.clone()).into_response());
    }
    None
}

async fn list_products(
    State(state): State<SharedState>,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let search = params.get("search").cloned();
    if let Some(response) = record(&state, &uri, &headers, search.clone()) {
        return response;
    }

    let needle = search.unwrap_or_default().to_lowercase();
    let products: Vec<Phone> = lock(&state)
        .products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.brand.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    Json(products).into_response()
}

async fn get_product(
    State(state): State<SharedState>,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Some(response) = record(&state, &uri, &headers, None) {
        return response;
    }

    let detail = lock(&state).details.get(&id).cloned();
    detail.map_or_else(
        || (StatusCode::NOT_FOUND, Json(json!({ "error": "Product not found" }))).into_response(),
        |d| Json(d).into_response(),
    )
}

// =============================================================================
// Fixtures
// =============================================================================

/// Catalog listing: two phones plus a repeated id whose later entry wins.
///
/// # Panics
///
/// Panics if the fixture JSON does not match [`Phone`].
#[must_use]
pub fn listing() -> Vec<Phone> {
    serde_json::from_value(json!([
        { "id": "APL-IP15", "brand": "Apple", "name": "iPhone 15", "basePrice": 959, "imageUrl": "https://img.test/ip15.png" },
        { "id": "SMG-S24", "brand": "Samsung", "name": "Galaxy S24", "basePrice": 899, "imageUrl": "https://img.test/s24.png" },
        { "id": "SMG-S24", "brand": "Samsung", "name": "Galaxy S24 (2024)", "basePrice": 879, "imageUrl": "https://img.test/s24.png" }
    ]))
    .expect("Invalid listing fixture")
}

/// Detail record for `SMG-S24`.
///
/// # Panics
///
/// Panics if the fixture JSON does not match [`PhoneDetail`].
#[must_use]
pub fn galaxy_detail() -> PhoneDetail {
    serde_json::from_value(json!({
        "id": "SMG-S24",
        "brand": "Samsung",
        "name": "Galaxy S24",
        "description": "Compact flagship",
        "basePrice": 899,
        "rating": 4.5,
        "specs": {
            "screen": "6.2\" Dynamic AMOLED 2X",
            "processor": "Exynos 2400",
            "os": "Android 14"
        },
        "colorOptions": [
            { "name": "Onyx Black", "hexCode": "#000000", "imageUrl": "https://img.test/s24-black.png" },
            { "name": "Cobalt Violet", "hexCode": "#8A2BE2", "imageUrl": "https://img.test/s24-violet.png" }
        ],
        "storageOptions": [
            { "capacity": "128 GB", "price": 899 },
            { "capacity": "256 GB", "price": 959.5 }
        ],
        "similarProducts": [
            { "id": "APL-IP15", "brand": "Apple", "name": "iPhone 15", "basePrice": 959, "imageUrl": "" },
            { "id": "APL-IP15", "brand": "Apple", "name": "iPhone 15 (new)", "basePrice": 949, "imageUrl": "" }
        ]
    }))
    .expect("Invalid detail fixture")
}
