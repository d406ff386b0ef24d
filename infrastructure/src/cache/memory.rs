//! In-memory cache store

use async_trait::async_trait;
use genai_application::ports::cache_store::{CacheStore, CacheStoreError};
use genai_domain::{CacheEntry, CacheKey};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Key → entry map living as long as the process.
#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheStoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: CacheKey, entry: CacheEntry) -> Result<(), CacheStoreError> {
        self.entries.write().await.insert(key, entry);
        Ok(())
    }

    async fn len(&self) -> Result<usize, CacheStoreError> {
        Ok(self.entries.read().await.len())
    }
}
