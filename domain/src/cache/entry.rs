//! Cache entry entity

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Opaque reference to a primed, expensive-to-construct model context
/// (e.g. `cachedContents/abc123`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CachedContentHandle(String);

impl CachedContentHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CachedContentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored value of the document cache.
///
/// `ttl` is the lifetime the backend was asked to keep the primed context.
/// In-process stores never evict on it; persistent stores drop entries
/// that expired before they were loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub handle: CachedContentHandle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Duration>,
    pub created_at: SystemTime,
}

impl CacheEntry {
    pub fn new(handle: CachedContentHandle, ttl: Option<Duration>) -> Self {
        Self {
            handle,
            ttl,
            created_at: SystemTime::now(),
        }
    }

    /// When the backend is expected to drop the primed context, if a TTL was set.
    pub fn expires_at(&self) -> Option<SystemTime> {
        self.ttl.map(|ttl| self.created_at + ttl)
    }

    /// Whether the backend has dropped the primed context by `now`.
    ///
    /// Entries without a TTL never expire.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        self.expires_at().is_some_and(|expires| expires <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_at() {
        let entry = CacheEntry::new(
            CachedContentHandle::new("cachedContents/1"),
            Some(Duration::from_secs(3600)),
        );
        assert_eq!(
            entry.expires_at(),
            Some(entry.created_at + Duration::from_secs(3600))
        );

        let entry = CacheEntry::new(CachedContentHandle::new("cachedContents/2"), None);
        assert!(entry.expires_at().is_none());
    }

    #[test]
    fn test_is_expired_at() {
        let entry = CacheEntry::new(
            CachedContentHandle::new("cachedContents/1"),
            Some(Duration::from_secs(60)),
        );
        assert!(!entry.is_expired_at(entry.created_at + Duration::from_secs(59)));
        assert!(entry.is_expired_at(entry.created_at + Duration::from_secs(60)));

        let forever = CacheEntry::new(CachedContentHandle::new("cachedContents/2"), None);
        assert!(!forever.is_expired_at(forever.created_at + Duration::from_secs(86_400 * 365)));
    }

    #[test]
    fn test_serde_roundtrip() {
        let entry = CacheEntry::new(
            CachedContentHandle::new("cachedContents/abc"),
            Some(Duration::from_secs(60)),
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"cachedContents/abc\""));
        let back: CacheEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
