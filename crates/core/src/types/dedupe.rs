//! Ordered deduplication by identity.
//!
//! Collapses a sequence to one entry per id. The most recently seen entry's
//! data wins, but it keeps the position where the id first appeared. Backed
//! by [`IndexMap`], whose `insert` on an existing key replaces the value in
//! place.

use std::hash::Hash;

use indexmap::IndexMap;

/// Records with a stable identity.
pub trait HasId {
    type Id: Hash + Eq + Clone;

    fn id(&self) -> &Self::Id;
}

/// Deduplicate `items` by id, last occurrence wins, first-seen order kept.
pub fn dedupe_by_id<T, I>(items: I) -> Vec<T>
where
    T: HasId,
    I: IntoIterator<Item = T>,
{
    let mut unique: IndexMap<T::Id, T> = IndexMap::new();
    for item in items {
        unique.insert(item.id().clone(), item);
    }
    unique.into_values().collect()
}
