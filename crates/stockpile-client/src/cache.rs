//! Normalized in-memory item collection.
//!
//! Items are keyed by id with a separate ordered index sorted by
//! `(name, id)`. The index is patched incrementally on each mutation
//! so reads never re-sort. The cache mirrors server state; it is never
//! authoritative.

use std::collections::HashMap;

use stockpile_core::{Item, ItemId};

/// Load status of the cache.
///
/// A fetch-all moves any state to `Loading`, then to `Loaded`
/// (replacing the set) or `Errored` (keeping the previous set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Normalized id → item mapping with a sorted secondary index.
#[derive(Debug)]
pub struct ItemCache {
    entities: HashMap<ItemId, Item>,
    order: Vec<ItemId>,
    status: CacheStatus,
    error: Option<String>,
}

impl ItemCache {
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            order: Vec::new(),
            status: CacheStatus::Idle,
            error: None,
        }
    }

    pub fn status(&self) -> CacheStatus {
        self.status
    }

    /// Last fetch-all failure message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All items in `(name, id)` order.
    pub fn all(&self) -> Vec<&Item> {
        self.order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .collect()
    }

    /// Ids in `(name, id)` order.
    pub fn ids(&self) -> &[ItemId] {
        &self.order
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.entities.get(&id)
    }

    /// Mark a fetch-all in flight. The current set stays readable.
    pub fn begin_fetch(&mut self) {
        self.status = CacheStatus::Loading;
    }

    /// Replace the whole set with a fresh server snapshot.
    pub fn finish_fetch(&mut self, items: Vec<Item>) {
        self.entities = items.into_iter().map(|item| (item.id, item)).collect();
        self.order = self.entities.keys().copied().collect();
        let entities = &self.entities;
        self.order.sort_by(|a, b| sort_key(&entities[a]).cmp(&sort_key(&entities[b])));
        self.status = CacheStatus::Loaded;
        self.error = None;
    }

    /// Record a failed fetch-all. The previous set is preserved.
    pub fn fail_fetch(&mut self, message: impl Into<String>) {
        self.status = CacheStatus::Errored;
        self.error = Some(message.into());
    }

    /// Insert or replace one item, keeping the index sorted.
    /// Idempotent: applying the same item twice is a no-op the second
    /// time.
    pub fn upsert_one(&mut self, item: Item) {
        let id = item.id;
        if self.entities.insert(id, item).is_some() {
            self.order.retain(|existing| *existing != id);
        }
        let item = &self.entities[&id];
        let key = sort_key(item);
        let entities = &self.entities;
        let position = self
            .order
            .partition_point(|other| sort_key(&entities[other]) < key);
        self.order.insert(position, id);
    }

    /// Remove one item by id; unknown ids are ignored.
    pub fn remove_one(&mut self, id: ItemId) {
        if self.entities.remove(&id).is_some() {
            self.order.retain(|existing| *existing != id);
        }
    }

    /// Remove a set of ids; missing ids are skipped.
    pub fn remove_many(&mut self, ids: &[ItemId]) {
        for id in ids {
            self.entities.remove(id);
        }
        let entities = &self.entities;
        self.order.retain(|id| entities.contains_key(id));
    }
}

impl Default for ItemCache {
    fn default() -> Self {
        Self::new()
    }
}

fn sort_key(item: &Item) -> (&str, ItemId) {
    (item.name.as_str(), item.id)
}
