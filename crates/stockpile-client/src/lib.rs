//! Stockpile Client
//!
//! Async API client plus a normalized, sorted in-memory cache of
//! items. UI layers dispatch an operation and read the cache back;
//! mutations patch the cache only on success, so a failed call never
//! leaves it partially updated.

pub mod api;
pub mod cache;

pub use api::{ClientError, CreateItemRequest, ItemsApi, UpdateItemRequest};
pub use cache::{CacheStatus, ItemCache};

use stockpile_core::{Item, ItemId};

/// Remote item collection: an [`ItemsApi`] driving an [`ItemCache`].
///
/// `refresh` replaces the whole set; the mutating operations patch it
/// incrementally instead of forcing a reload, trading a small
/// staleness window for responsiveness.
pub struct RemoteItems {
    api: ItemsApi,
    cache: ItemCache,
}

impl RemoteItems {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ItemsApi::new(base_url),
            cache: ItemCache::new(),
        }
    }

    /// Read access to the cached state.
    pub fn cache(&self) -> &ItemCache {
        &self.cache
    }

    /// Fetch-all. On failure the previous set stays readable and the
    /// error message is recorded on the cache.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.cache.begin_fetch();
        match self.api.get_all().await {
            Ok(items) => {
                self.cache.finish_fetch(items);
                Ok(())
            }
            Err(err) => {
                self.cache.fail_fetch(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn create(&mut self, request: &CreateItemRequest) -> Result<Item, ClientError> {
        let item = self.api.create(request).await?;
        self.cache.upsert_one(item.clone());
        Ok(item)
    }

    pub async fn update(
        &mut self,
        id: ItemId,
        request: &UpdateItemRequest,
    ) -> Result<Item, ClientError> {
        let item = self.api.update(id, request).await?;
        self.cache.upsert_one(item.clone());
        Ok(item)
    }

    pub async fn delete(&mut self, id: ItemId) -> Result<(), ClientError> {
        self.api.delete(id).await?;
        self.cache.remove_one(id);
        Ok(())
    }

    pub async fn delete_many(&mut self, ids: &[ItemId]) -> Result<(), ClientError> {
        self.api.delete_many(ids).await?;
        self.cache.remove_many(ids);
        Ok(())
    }
}
