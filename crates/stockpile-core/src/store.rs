use crate::item::{Item, ItemId, ItemPatch, NewItem};

/// The trait that storage backends implement.
///
/// The store is the sole source of truth for items. Ordering of
/// [`ItemStore::list`] is unspecified; callers that need an order sort
/// on their side.
pub trait ItemStore: Send + Sync {
    /// Insert a new item. The store assigns the id and timestamps.
    fn create(&self, item: NewItem) -> Result<Item, StoreError>;

    /// All items, in no particular order.
    fn list(&self) -> Result<Vec<Item>, StoreError>;

    /// Get an item by id. Absence is `Ok(None)`, not an error.
    fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    /// Merge the provided fields into an existing row and bump
    /// `updated_at`. Fails with [`StoreError::NotFound`] if the id is
    /// absent.
    fn update(&self, id: ItemId, patch: ItemPatch) -> Result<Item, StoreError>;

    /// Delete a single item. Fails with [`StoreError::NotFound`] if
    /// the id is absent.
    fn delete(&self, id: ItemId) -> Result<(), StoreError>;

    /// Delete every listed id that exists and return the count
    /// removed. Missing ids are silently skipped.
    fn delete_many(&self, ids: &[ItemId]) -> Result<usize, StoreError>;
}

/// Errors from the item store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::NotFound(999);
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("999"));

        let err = StoreError::Storage("disk full".into());
        assert!(err.to_string().contains("disk full"));
    }
}
