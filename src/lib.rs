//! Bounded LRU - A generic in-memory cache with a fixed capacity
//!
//! Holds at most `capacity` entries and evicts the least recently used one
//! when a new key would overflow it.
//!
//! ```
//! use bounded_lru::LruCache;
//!
//! let mut cache = LruCache::new(2).unwrap();
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");
//! cache.put("c", 3);
//!
//! assert!(cache.contains_key(&"a"));
//! assert!(!cache.contains_key(&"b"));
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{
    CacheObserver, CacheStats, Insertion, LruCache, NoopObserver, SharedCache, TracingObserver,
};
pub use config::Config;
pub use error::{CacheError, Result};
