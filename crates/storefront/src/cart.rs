//! Shopping cart store.
//!
//! The cart is a set of line items keyed by [`LineId`], kept in insertion
//! order and persisted as a JSON array under [`CART_STORAGE_KEY`].
//!
//! # Lifecycle
//!
//! A store starts `Uninitialized`. [`CartStore::hydrate`] reads the persisted
//! cart once and moves the store to `Ready`. Only a `Ready` store writes to
//! storage, so an empty in-memory cart can never overwrite a persisted one
//! before it has been read.
//!
//! Persistence is best-effort: unreadable data hydrates as an empty cart and
//! failed writes are logged, while the in-memory cart stays authoritative for
//! the session.

use std::collections::HashSet;
use std::sync::Arc;

use mobile_store_core::{CartLineItem, LineId, Price};
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageError};

/// Storage key of the persisted cart. Bump the version to migrate the schema.
pub const CART_STORAGE_KEY: &str = "mobile_store_cart_v1";

/// Errors returned to callers of the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// Line items must carry their derived line id.
    #[error("Cart line item has an empty line id")]
    EmptyLineId,
}

/// Persistence failures. Logged, never returned to callers.
#[derive(Debug, Error)]
pub enum CartPersistenceError {
    #[error("Persisted cart is corrupt: {0}")]
    PersistenceCorrupt(#[source] serde_json::Error),

    #[error("Failed to read persisted cart: {0}")]
    PersistenceReadFailed(#[source] StorageError),

    #[error("Failed to encode cart: {0}")]
    PersistenceEncodeFailed(#[source] serde_json::Error),

    #[error("Failed to persist cart: {0}")]
    PersistenceWriteFailed(#[source] StorageError),
}

/// Lifecycle of a [`CartStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartPhase {
    /// Persisted data not read yet; mutations are not written.
    Uninitialized,
    /// Hydrated; every mutation is written.
    Ready,
}

/// Read-only view of the cart with derived totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub count: usize,
    pub total_price: Price,
}

impl CartSnapshot {
    /// Whether the cart has no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// The cart. Construct one per session and pass it to whatever needs it.
pub struct CartStore {
    storage: Arc<dyn KeyValueStore>,
    items: Vec<CartLineItem>,
    phase: CartPhase,
}

impl CartStore {
    /// Create an empty, uninitialized store.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            items: Vec::new(),
            phase: CartPhase::Uninitialized,
        }
    }

    /// Create a store and hydrate it from `storage`.
    #[must_use]
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self::new(storage);
        store.hydrate();
        store
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> CartPhase {
        self.phase
    }

    /// Load the persisted cart and become `Ready`.
    ///
    /// Replaces any in-memory items. Absent, unreadable or corrupt data yields
    /// an empty cart. Calling it on a `Ready` store does nothing.
    pub fn hydrate(&mut self) {
        if self.phase == CartPhase::Ready {
            return;
        }

        self.items = match self.load() {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, "Discarding unreadable persisted cart");
                Vec::new()
            }
        };
        self.phase = CartPhase::Ready;
        debug!(count = self.items.len(), "Cart hydrated");
    }

    fn load(&self) -> Result<Vec<CartLineItem>, CartPersistenceError> {
        let Some(raw) = self
            .storage
            .get(CART_STORAGE_KEY)
            .map_err(CartPersistenceError::PersistenceReadFailed)?
        else {
            return Ok(Vec::new());
        };

        let parsed: Vec<CartLineItem> =
            serde_json::from_str(&raw).map_err(CartPersistenceError::PersistenceCorrupt)?;

        // Tampered data may repeat a line; the first occurrence is the one kept.
        let mut seen = HashSet::new();
        Ok(parsed
            .into_iter()
            .filter_map(|mut item| {
                item.line_id = item.key();
                seen.insert(item.line_id.clone()).then_some(item)
            })
            .collect())
    }

    /// Add a line item.
    ///
    /// Returns `Ok(false)` without touching the cart when a line with the same
    /// id is already present; the existing entry and its price are kept.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyLineId`] if the item has no line id.
    pub fn add_item(&mut self, item: CartLineItem) -> Result<bool, CartError> {
        if item.line_id.is_empty() {
            return Err(CartError::EmptyLineId);
        }
        if self.contains(&item.line_id) {
            debug!(line_id = %item.line_id, "Line already in cart");
            return Ok(false);
        }

        self.items.push(item);
        self.persist();
        Ok(true)
    }

    /// Remove the line with `line_id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, line_id: &LineId) -> bool {
        let Some(index) = self.items.iter().position(|i| &i.line_id == line_id) else {
            return false;
        };

        self.items.remove(index);
        self.persist();
        true
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Whether a line with `line_id` is in the cart.
    #[must_use]
    pub fn contains(&self, line_id: &LineId) -> bool {
        self.items.iter().any(|i| &i.line_id == line_id)
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of lines.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Sum of the frozen unit prices.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(|i| i.unit_price).sum()
    }

    /// Snapshot with totals computed from the current items.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            count: self.count(),
            total_price: self.total_price(),
        }
    }

    fn persist(&self) {
        if self.phase != CartPhase::Ready {
            debug!("Cart not hydrated yet, skipping write");
            return;
        }
        if let Err(err) = self.write() {
            warn!(error = %err, "Cart kept in memory only");
        }
    }

    fn write(&self) -> Result<(), CartPersistenceError> {
        let raw = serde_json::to_string(&self.items)
            .map_err(CartPersistenceError::PersistenceEncodeFailed)?;
        self.storage
            .set(CART_STORAGE_KEY, &raw)
            .map_err(CartPersistenceError::PersistenceWriteFailed)
    }
}
