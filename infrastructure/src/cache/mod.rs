//! Cache storage backends for the document cache.
//!
//! - [`InMemoryCacheStore`]: process lifetime
//! - [`JsonFileCacheStore`]: JSON file, survives restarts

mod file_store;
mod memory;

pub use file_store::JsonFileCacheStore;
pub use memory::InMemoryCacheStore;
