//! Cache store port: where primed handles are remembered.

use async_trait::async_trait;
use genai_domain::{CacheEntry, CacheKey};
use thiserror::Error;

/// Errors from a cache storage backend
#[derive(Error, Debug)]
pub enum CacheStoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Key → entry storage for the document cache.
///
/// Implementations may be in-memory (process lifetime) or backed by an
/// external store. Entries are never evicted.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheStoreError>;

    async fn put(&self, key: CacheKey, entry: CacheEntry) -> Result<(), CacheStoreError>;

    async fn len(&self) -> Result<usize, CacheStoreError>;
}
