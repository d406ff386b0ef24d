//! JSON file cache store

use async_trait::async_trait;
use genai_application::ports::cache_store::{CacheStore, CacheStoreError};
use genai_domain::{CacheEntry, CacheKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: CacheKey,
    #[serde(flatten)]
    entry: CacheEntry,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    entries: Vec<StoredEntry>,
}

/// Cache store persisted as a JSON file.
///
/// The whole file is loaded on open and rewritten on every `put` (write to
/// a sibling temp file, then rename). Entries whose TTL ran out before the
/// store was opened are skipped, so their documents get primed again.
pub struct JsonFileCacheStore {
    path: PathBuf,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl JsonFileCacheStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, CacheStoreError> {
        let path = path.into();
        let stored = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let file: StoreFile = serde_json::from_slice(&bytes)
                    .map_err(|e| CacheStoreError::Serialization(e.to_string()))?;
                file.entries
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(CacheStoreError::Io(e.to_string())),
        };

        let now = SystemTime::now();
        let total = stored.len();
        let entries: HashMap<CacheKey, CacheEntry> = stored
            .into_iter()
            .filter(|stored| !stored.entry.is_expired_at(now))
            .map(|stored| (stored.key, stored.entry))
            .collect();
        debug!(
            path = %path.display(),
            entries = entries.len(),
            expired = total - entries.len(),
            "Opened cache store"
        );

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &HashMap<CacheKey, CacheEntry>) -> Result<(), CacheStoreError> {
        let mut stored: Vec<StoredEntry> = entries
            .iter()
            .map(|(key, entry)| StoredEntry {
                key: key.clone(),
                entry: entry.clone(),
            })
            .collect();
        stored.sort_by(|a, b| a.key.cmp(&b.key));

        let json = serde_json::to_vec_pretty(&StoreFile { entries: stored })
            .map_err(|e| CacheStoreError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CacheStoreError::Io(e.to_string()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| CacheStoreError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| CacheStoreError::Io(e.to_string()))
    }
}

#[async_trait]
impl CacheStore for JsonFileCacheStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheStoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: CacheKey, entry: CacheEntry) -> Result<(), CacheStoreError> {
        let mut entries = self.entries.lock().await;
        let previous = entries.insert(key.clone(), entry);
        if let Err(e) = self.persist(&entries).await {
            // Memory and file must agree.
            match previous {
                Some(previous) => entries.insert(key, previous),
                None => entries.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn len(&self) -> Result<usize, CacheStoreError> {
        Ok(self.entries.lock().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genai_domain::CachedContentHandle;
    use std::time::Duration;

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCacheStore::open(dir.path().join("cache.json"))
            .await
            .unwrap();
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("cache.json");

        {
            let store = JsonFileCacheStore::open(&path).await.unwrap();
            store
                .put(
                    CacheKey::from_ids(["doc_b", "doc_a"]).unwrap(),
                    CacheEntry::new(
                        CachedContentHandle::new("cachedContents/abc"),
                        Some(Duration::from_secs(3600)),
                    ),
                )
                .await
                .unwrap();
        }

        let reopened = JsonFileCacheStore::open(&path).await.unwrap();
        let entry = reopened
            .get(&CacheKey::from_ids(["doc_a", "doc_b"]).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.handle.as_str(), "cachedContents/abc");
        assert_eq!(entry.ttl, Some(Duration::from_secs(3600)));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["entries"][0]["key"], serde_json::json!(["doc_a", "doc_b"]));
    }

    #[tokio::test]
    async fn test_expired_entries_skipped_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let two_hours_ago = SystemTime::now() - Duration::from_secs(2 * 3600);

        {
            let store = JsonFileCacheStore::open(&path).await.unwrap();
            let mut expired = CacheEntry::new(
                CachedContentHandle::new("cachedContents/dead"),
                Some(Duration::from_secs(3600)),
            );
            expired.created_at = two_hours_ago;
            store
                .put(CacheKey::from_ids(["old"]).unwrap(), expired)
                .await
                .unwrap();

            let mut no_ttl = CacheEntry::new(CachedContentHandle::new("cachedContents/keep"), None);
            no_ttl.created_at = two_hours_ago;
            store
                .put(CacheKey::from_ids(["pinned"]).unwrap(), no_ttl)
                .await
                .unwrap();

            // Same process: the expired entry is still served.
            assert!(
                store
                    .get(&CacheKey::from_ids(["old"]).unwrap())
                    .await
                    .unwrap()
                    .is_some()
            );
        }

        let reopened = JsonFileCacheStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get(&CacheKey::from_ids(["old"]).unwrap()).await.unwrap(),
            None
        );
        assert_eq!(reopened.len().await.unwrap(), 1);
        let kept = reopened
            .get(&CacheKey::from_ids(["pinned"]).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.handle.as_str(), "cachedContents/keep");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileCacheStore::open(&path).await,
            Err(CacheStoreError::Serialization(_))
        ));
    }
}
