//! Cache key value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Order-independent identifier of a document set (Value Object)
///
/// Duplicate ids collapse and ordering is irrelevant, so `["a", "b"]`,
/// `["b", "a"]` and `["a", "b", "a"]` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(BTreeSet<String>);

impl CacheKey {
    /// Build a key from document ids.
    ///
    /// Fails on an empty set or on a blank id.
    pub fn from_ids<I, S>(ids: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for id in ids {
            let id = id.into();
            if id.trim().is_empty() {
                return Err(DomainError::InvalidDocumentId(id));
            }
            set.insert(id);
        }
        if set.is_empty() {
            return Err(DomainError::EmptyDocumentSet);
        }
        Ok(Self(set))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.ids().collect::<Vec<_>>().join(", "))
    }
}
