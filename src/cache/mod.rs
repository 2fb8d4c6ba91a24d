//! Cache Module
//!
//! Provides a bounded in-memory cache with least recently used eviction.

mod entry;
mod lru;
mod observer;
mod shared;
mod stats;
mod store;


pub(crate) use entry::CacheEntry;

// Re-export public types
pub use observer::{CacheObserver, NoopObserver, TracingObserver};
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::{Insertion, LruCache};
