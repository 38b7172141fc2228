//! Catalog search with debounced dispatch.
//!
//! [`CatalogQuery`] turns free-text input into catalog requests:
//!
//! - The raw query is echoed immediately; a request is dispatched only after
//!   the input has been stable for the debounce period
//! - Each response is tagged with the query it was issued for and applied only
//!   if that query is still the current debounced query, so a slow response to
//!   an older query can never replace newer results
//! - An empty query dispatches nothing and restores the initial product list
//! - A failed request records a classified error and keeps the previous results
//!
//! State is published through a `tokio::sync::watch` channel.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut query = CatalogQuery::new(Arc::new(client), initial_products);
//! let mut updates = query.subscribe();
//!
//! query.set_query("galaxy");
//! updates.changed().await?;
//! println!("{}", updates.borrow().results_label());
//! ```

mod debounce;

pub use debounce::{CancelHandle, Debouncer, schedule_after};

use std::sync::Arc;
use std::time::Duration;

use mobile_store_core::{Phone, dedupe_by_id};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::catalog::{CatalogError, ProductCatalog};

/// Quiet period before a query is dispatched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Classified failure of the last search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorKind {
    /// No response was received.
    NetworkError,
    /// The catalog answered with an error or an unreadable body.
    SearchFailed,
}

impl SearchErrorKind {
    /// User-facing message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NetworkError => "Network error. Check your connection and try again.",
            Self::SearchFailed => "Search failed. Please try again.",
        }
    }
}

impl From<&CatalogError> for SearchErrorKind {
    fn from(err: &CatalogError) -> Self {
        if err.is_network() {
            Self::NetworkError
        } else {
            Self::SearchFailed
        }
    }
}

/// Observable search state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQueryState {
    /// Text as typed.
    pub raw_query: String,
    /// Text of the last dispatched query; empty means the initial list.
    pub debounced_query: String,
    /// Deduplicated products to display.
    pub results: Vec<Phone>,
    pub is_loading: bool,
    pub error: Option<SearchErrorKind>,
}

impl SearchQueryState {
    /// Result counter, e.g. `12 RESULTS`, or `... RESULTS` while loading.
    #[must_use]
    pub fn results_label(&self) -> String {
        if self.is_loading {
            "... RESULTS".to_string()
        } else {
            format!("{} RESULTS", self.results.len())
        }
    }
}

/// State shared with timer and request tasks.
struct Shared {
    catalog: Arc<dyn ProductCatalog>,
    initial: Vec<Phone>,
    state: watch::Sender<SearchQueryState>,
}

impl Shared {
    /// Start a request for `query`. Runs when the debounce timer fires.
    ///
    /// A timer that fired after its text was replaced dispatches nothing.
    fn dispatch(self: Arc<Self>, query: String) {
        let current = self.state.send_if_modified(|state| {
            if state.raw_query != query {
                return false;
            }
            state.debounced_query.clone_from(&query);
            state.is_loading = true;
            true
        });
        if !current {
            debug!(query = %query, "Skipping superseded catalog search");
            return;
        }
        debug!(query = %query, "Dispatching catalog search");

        // Detached: cancelling the timer must not abort an in-flight request
        tokio::spawn(async move {
            let result = self.catalog.list_products(Some(&query)).await;
            self.apply(&query, result);
        });
    }

    /// Apply a response if `query` is still current.
    fn apply(&self, query: &str, result: Result<Vec<Phone>, CatalogError>) {
        self.state.send_if_modified(|state| {
            if state.debounced_query != query {
                debug!(query = %query, current = %state.debounced_query, "Ignoring stale search response");
                return false;
            }

            state.is_loading = false;
            match result {
                Ok(products) => {
                    state.results = dedupe_by_id(products);
                    state.error = None;
                }
                Err(err) => {
                    warn!(query = %query, error = %err, "Catalog search failed");
                    state.error = Some(SearchErrorKind::from(&err));
                }
            }
            true
        });
    }

    fn restore_initial(&self) {
        let results = dedupe_by_id(self.initial.iter().cloned());
        self.state.send_modify(|state| {
            state.debounced_query.clear();
            state.results = results;
            state.is_loading = false;
            state.error = None;
        });
    }
}

/// Debounced, stale-safe catalog search controller.
///
/// Timers and requests run on the ambient Tokio runtime, so
/// [`CatalogQuery::set_query`] must be called from within one. Dropping the
/// controller cancels a pending timer; an in-flight request completes but is
/// applied only to the (then unobserved) state.
pub struct CatalogQuery {
    shared: Arc<Shared>,
    debouncer: Debouncer,
    debounce: Duration,
}

impl CatalogQuery {
    /// Create a controller showing `initial` until a query is entered.
    #[must_use]
    pub fn new(catalog: Arc<dyn ProductCatalog>, initial: Vec<Phone>) -> Self {
        Self::with_debounce(catalog, initial, DEFAULT_DEBOUNCE)
    }

    /// Create a controller with a custom quiet period.
    #[must_use]
    pub fn with_debounce(
        catalog: Arc<dyn ProductCatalog>,
        initial: Vec<Phone>,
        debounce: Duration,
    ) -> Self {
        let state = SearchQueryState {
            results: dedupe_by_id(initial.iter().cloned()),
            ..SearchQueryState::default()
        };
        let (tx, _) = watch::channel(state);

        Self {
            shared: Arc::new(Shared {
                catalog,
                initial,
                state: tx,
            }),
            debouncer: Debouncer::new(),
            debounce,
        }
    }

    /// Update the search text.
    ///
    /// The raw query changes at once. A non-empty query is dispatched after the
    /// debounce period unless replaced first; an empty query cancels any
    /// pending dispatch and restores the initial list immediately.
    #[instrument(skip(self, text))]
    pub fn set_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.shared
            .state
            .send_modify(|state| state.raw_query.clone_from(&text));

        if text.is_empty() {
            self.debouncer.cancel();
            self.shared.restore_initial();
            return;
        }

        let shared = Arc::clone(&self.shared);
        self.debouncer
            .schedule(self.debounce, move || shared.dispatch(text));
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> SearchQueryState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchQueryState> {
        self.shared.state.subscribe()
    }

    /// Quiet period in use.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        self.debounce
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use mobile_store_core::{PhoneDetail, PhoneId, Price};
    use tokio::time::sleep;

    use super::*;

    #[derive(Clone)]
    enum Reply {
        Products(Vec<Phone>),
        Status(u16),
        Offline,
    }

    /// In-memory catalog with per-query replies and latencies.
    #[derive(Default)]
    struct FakeCatalog {
        replies: HashMap<String, (Duration, Reply)>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn reply(mut self, query: &str, delay_ms: u64, reply: Reply) -> Self {
            self.replies
                .insert(query.to_string(), (Duration::from_millis(delay_ms), reply));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProductCatalog for FakeCatalog {
        async fn list_products(&self, search: Option<&str>) -> Result<Vec<Phone>, CatalogError> {
            let query = search.unwrap_or_default().to_string();
            self.calls.lock().unwrap().push(query.clone());

            let (delay, reply) = self
                .replies
                .get(&query)
                .cloned()
                .unwrap_or((Duration::ZERO, Reply::Products(Vec::new())));
            sleep(delay).await;

            match reply {
                Reply::Products(products) => Ok(products),
                Reply::Status(status) => Err(CatalogError::Api {
                    status,
                    status_text: "Internal Server Error".to_string(),
                }),
                Reply::Offline => Err(CatalogError::Network(
                    reqwest::Client::new().get("http://[::1").build().unwrap_err(),
                )),
            }
        }

        async fn get_product_by_id(&self, id: &PhoneId) -> Result<PhoneDetail, CatalogError> {
            Err(CatalogError::Api {
                status: 404,
                status_text: format!("Not Found: {id}"),
            })
        }
    }

    fn phone(id: &str, name: &str) -> Phone {
        Phone {
            id: PhoneId::new(id),
            brand: "Brand".to_string(),
            name: name.to_string(),
            base_price: Price::from_units(100),
            image_url: String::new(),
        }
    }

    fn names(state: &SearchQueryState) -> Vec<&str> {
        state.results.iter().map(|p| p.name.as_str()).collect()
    }

    fn controller(fake: &Arc<FakeCatalog>, initial: Vec<Phone>) -> CatalogQuery {
        CatalogQuery::new(Arc::clone(fake) as Arc<dyn ProductCatalog>, initial)
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_state_is_deduplicated_initial_list() {
        let fake = Arc::new(FakeCatalog::default());
        let query = controller(
            &fake,
            vec![phone("1", "a"), phone("2", "b"), phone("1", "c")],
        );

        let state = query.snapshot();
        assert_eq!(names(&state), vec!["c", "b"]);
        assert_eq!(state.results_label(), "2 RESULTS");
        assert!(fake.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_stable_input_is_dispatched() {
        let fake = Arc::new(FakeCatalog::default().reply(
            "gal",
            0,
            Reply::Products(vec![phone("1", "Galaxy")]),
        ));
        let mut query = controller(&fake, Vec::new());

        query.set_query("g");
        sleep(Duration::from_millis(100)).await;
        query.set_query("ga");
        sleep(Duration::from_millis(100)).await;
        query.set_query("gal");

        let state = query.snapshot();
        assert_eq!(state.raw_query, "gal");
        assert_eq!(state.debounced_query, "");

        sleep(Duration::from_millis(299)).await;
        assert!(fake.calls().is_empty());

        sleep(Duration::from_millis(10)).await;
        assert_eq!(fake.calls(), vec!["gal"]);
        let state = query.snapshot();
        assert_eq!(state.debounced_query, "gal");
        assert_eq!(names(&state), vec!["Galaxy"]);
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_while_request_in_flight() {
        let fake = Arc::new(FakeCatalog::default().reply(
            "pixel",
            200,
            Reply::Products(vec![phone("1", "Pixel")]),
        ));
        let mut query = controller(&fake, vec![phone("9", "Initial")]);

        query.set_query("pixel");
        sleep(Duration::from_millis(350)).await;
        let state = query.snapshot();
        assert!(state.is_loading);
        assert_eq!(state.results_label(), "... RESULTS");
        assert_eq!(names(&state), vec!["Initial"]);

        sleep(Duration::from_millis(200)).await;
        let state = query.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.results_label(), "1 RESULTS");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_ignored() {
        let fake = Arc::new(
            FakeCatalog::default()
                .reply("a", 500, Reply::Products(vec![phone("1", "from a")]))
                .reply("ab", 10, Reply::Products(vec![phone("2", "from ab")])),
        );
        let mut query = controller(&fake, Vec::new());

        query.set_query("a");
        sleep(Duration::from_millis(301)).await;
        assert_eq!(fake.calls(), vec!["a"]);

        query.set_query("ab");
        sleep(Duration::from_millis(350)).await;
        assert_eq!(names(&query.snapshot()), vec!["from ab"]);

        // "a" resolves now, long after "ab"
        sleep(Duration::from_secs(1)).await;
        let state = query.snapshot();
        assert_eq!(fake.calls(), vec!["a", "ab"]);
        assert_eq!(state.debounced_query, "ab");
        assert_eq!(names(&state), vec!["from ab"]);
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_restores_initial_without_request() {
        let fake = Arc::new(FakeCatalog::default().reply(
            "x",
            0,
            Reply::Products(vec![phone("5", "X")]),
        ));
        let initial = vec![phone("1", "a"), phone("2", "b")];
        let mut query = controller(&fake, initial);

        query.set_query("x");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(names(&query.snapshot()), vec!["X"]);

        query.set_query("");
        let state = query.snapshot();
        assert_eq!(names(&state), vec!["a", "b"]);
        assert_eq!(state.debounced_query, "");

        sleep(Duration::from_secs(1)).await;
        assert_eq!(fake.calls(), vec!["x"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_cancels_pending_dispatch() {
        let fake = Arc::new(FakeCatalog::default());
        let mut query = controller(&fake, vec![phone("1", "a")]);

        query.set_query("iph");
        sleep(Duration::from_millis(100)).await;
        query.set_query("");

        sleep(Duration::from_secs(1)).await;
        assert!(fake.calls().is_empty());
        assert_eq!(names(&query.snapshot()), vec!["a"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fired_before_clear_does_not_revive_query() {
        let fake = Arc::new(FakeCatalog::default().reply(
            "x",
            0,
            Reply::Products(vec![phone("5", "X")]),
        ));
        let mut query = controller(&fake, vec![phone("1", "a")]);

        query.set_query("x");
        query.set_query("");
        // Timer task already running when the clear cancelled it
        Arc::clone(&query.shared).dispatch("x".to_string());

        sleep(Duration::from_secs(1)).await;
        let state = query.snapshot();
        assert_eq!(state.raw_query, "");
        assert_eq!(state.debounced_query, "");
        assert!(!state.is_loading);
        assert_eq!(names(&state), vec!["a"]);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_for_replaced_text_is_skipped() {
        let fake = Arc::new(FakeCatalog::default());
        let mut query = controller(&fake, Vec::new());

        query.set_query("old");
        query.set_query("new");
        Arc::clone(&query.shared).dispatch("old".to_string());

        let state = query.snapshot();
        assert_eq!(state.debounced_query, "");
        assert!(!state.is_loading);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(fake.calls(), vec!["new"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_discards_in_flight_response() {
        let fake = Arc::new(FakeCatalog::default().reply(
            "slow",
            500,
            Reply::Products(vec![phone("7", "Slow")]),
        ));
        let mut query = controller(&fake, vec![phone("1", "a")]);

        query.set_query("slow");
        sleep(Duration::from_millis(350)).await;
        query.set_query("");

        sleep(Duration::from_secs(1)).await;
        let state = query.snapshot();
        assert_eq!(names(&state), vec!["a"]);
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_last_results() {
        let fake = Arc::new(
            FakeCatalog::default()
                .reply("ok", 0, Reply::Products(vec![phone("3", "Good")]))
                .reply("boom", 0, Reply::Status(500))
                .reply("offline", 0, Reply::Offline),
        );
        let mut query = controller(&fake, Vec::new());

        query.set_query("ok");
        sleep(Duration::from_millis(400)).await;

        query.set_query("boom");
        sleep(Duration::from_millis(400)).await;
        let state = query.snapshot();
        assert_eq!(state.error, Some(SearchErrorKind::SearchFailed));
        assert_eq!(names(&state), vec!["Good"]);
        assert!(!state.is_loading);

        query.set_query("offline");
        sleep(Duration::from_millis(400)).await;
        let state = query.snapshot();
        assert_eq!(state.error, Some(SearchErrorKind::NetworkError));
        assert_eq!(names(&state), vec!["Good"]);

        query.set_query("ok");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(query.snapshot().error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_results_are_deduplicated() {
        let fake = Arc::new(FakeCatalog::default().reply(
            "dup",
            0,
            Reply::Products(vec![phone("1", "a"), phone("2", "b"), phone("1", "c")]),
        ));
        let mut query = controller(&fake, Vec::new());

        query.set_query("dup");
        sleep(Duration::from_millis(400)).await;
        assert_eq!(names(&query.snapshot()), vec!["c", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_updates() {
        let fake = Arc::new(FakeCatalog::default().reply(
            "moto",
            0,
            Reply::Products(vec![phone("4", "Moto")]),
        ));
        let mut query = controller(&fake, Vec::new());
        let mut updates = query.subscribe();

        query.set_query("moto");
        let state = updates
            .wait_for(|s| s.debounced_query == "moto" && !s.is_loading)
            .await
            .unwrap()
            .clone();
        assert_eq!(names(&state), vec!["Moto"]);
    }

    #[test]
    fn test_error_kind_classification() {
        let api = CatalogError::Api {
            status: 503,
            status_text: "Service Unavailable".to_string(),
        };
        assert_eq!(SearchErrorKind::from(&api), SearchErrorKind::SearchFailed);
        assert_eq!(
            SearchErrorKind::from(&CatalogError::InvalidCredentials),
            SearchErrorKind::SearchFailed
        );
        assert_ne!(
            SearchErrorKind::NetworkError.message(),
            SearchErrorKind::SearchFailed.message()
        );
    }
}
