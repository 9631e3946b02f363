use std::sync::Arc;

use crate::item::{Item, ItemId, ItemPatch, NewItem};
use crate::store::{ItemStore, StoreError};

/// Thin CRUD operations over an [`ItemStore`].
///
/// This is the seam the HTTP layer consumes; it only sees validated
/// payloads (validation happens at the boundary, before any call in
/// here). Absence on `get_by_id` is an `Option`, not an error, so the
/// caller can map it to a not-found response directly.
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    pub fn create(&self, item: NewItem) -> Result<Item, StoreError> {
        self.store.create(item)
    }

    pub fn list(&self) -> Result<Vec<Item>, StoreError> {
        self.store.list()
    }

    pub fn get_by_id(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        self.store.get(id)
    }

    pub fn update(&self, id: ItemId, patch: ItemPatch) -> Result<Item, StoreError> {
        self.store.update(id, patch)
    }

    pub fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        self.store.delete(id)
    }

    /// Best-effort batch delete: ids with no match are skipped, the
    /// affected count is returned.
    pub fn delete_many(&self, ids: &[ItemId]) -> Result<usize, StoreError> {
        self.store.delete_many(ids)
    }
}
