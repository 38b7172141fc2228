//! Interactive catalog search.
//!
//! Each line read from stdin replaces the search text, as if typed into a
//! search box. Results are printed whenever the search state changes, so
//! quickly entered lines collapse into a single request.
//!
//! # Usage
//!
//! ```bash
//! printf 'g\nga\ngalaxy\n' | mstore browse
//! ```

use std::sync::Arc;
use std::time::Duration;

use mobile_store_storefront::catalog::CatalogClient;
use mobile_store_storefront::search::{CatalogQuery, SearchQueryState};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::products::print_products;
use crate::error::Result;

/// Run the search loop until stdin is closed and the last query has settled.
///
/// # Errors
///
/// Returns an error if the initial listing or reading stdin fails.
pub async fn run(client: &CatalogClient, debounce: Duration) -> Result<()> {
    let initial = client.list_products(None).await?;
    let mut query = CatalogQuery::with_debounce(Arc::new(client.clone()), initial, debounce);
    let mut updates = query.subscribe();
    render(&updates.borrow_and_update());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) => query.set_query(text.trim_end()),
                None => break,
            },
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                render(&updates.borrow_and_update());
            }
        }
    }

    // Let the last pending query dispatch and resolve
    if let Ok(state) = updates
        .wait_for(|s| s.raw_query == s.debounced_query && !s.is_loading)
        .await
    {
        render(&state);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn render(state: &SearchQueryState) {
    println!();
    if state.debounced_query.is_empty() {
        println!("{}", state.results_label());
    } else {
        println!("\"{}\": {}", state.debounced_query, state.results_label());
    }
    if let Some(error) = state.error {
        println!("{}", error.message());
    }
    if !state.is_loading {
        print_products(&state.results);
    }
}
