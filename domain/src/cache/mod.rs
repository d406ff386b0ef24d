//! Document cache domain.
//!
//! Priming a model session with large documents is expensive, so primed
//! sessions are memoized per *set* of document identifiers.
//!
//! - [`CacheKey`]: order-independent set of document ids
//! - [`CacheEntry`]: handle of a primed session plus its creation metadata
//! - [`Document`]: content payload used for priming on a cache miss

mod document;
mod entry;
mod key;

pub use document::{Document, DocumentContent};
pub use entry::{CacheEntry, CachedContentHandle};
pub use key::CacheKey;
