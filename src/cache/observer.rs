//! Cache Observer Module
//!
//! Optional instrumentation hooks invoked around cache operations.

use std::fmt::Debug;
use std::sync::Arc;

use tracing::debug;

// == Cache Observer ==
/// Receives a callback for every operation outcome of a cache.
///
/// All methods default to doing nothing, so implementors only override what
/// they care about. Observers cannot alter cache state.
pub trait CacheObserver<K> {
    /// A `get` found `key` and promoted it.
    fn on_hit(&self, _key: &K) {}

    /// A `get` did not find `key`.
    fn on_miss(&self, _key: &K) {}

    /// A `put` added `key` as a new entry.
    fn on_insert(&self, _key: &K) {}

    /// A `put` replaced the value stored under `key`.
    fn on_update(&self, _key: &K) {}

    /// `key` was evicted to make room for a new entry.
    fn on_evict(&self, _key: &K) {}

    /// A `remove` dropped `key`.
    fn on_remove(&self, _key: &K) {}

    /// A `clear` dropped `removed` entries.
    fn on_clear(&self, _removed: usize) {}
}

impl<K, O: CacheObserver<K> + ?Sized> CacheObserver<K> for Arc<O> {
    fn on_hit(&self, key: &K) {
        (**self).on_hit(key)
    }

    fn on_miss(&self, key: &K) {
        (**self).on_miss(key)
    }

    fn on_insert(&self, key: &K) {
        (**self).on_insert(key)
    }

    fn on_update(&self, key: &K) {
        (**self).on_update(key)
    }

    fn on_evict(&self, key: &K) {
        (**self).on_evict(key)
    }

    fn on_remove(&self, key: &K) {
        (**self).on_remove(key)
    }

    fn on_clear(&self, removed: usize) {
        (**self).on_clear(removed)
    }
}

// == Noop Observer ==
/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl<K> CacheObserver<K> for NoopObserver {}

// == Tracing Observer ==
/// Observer that logs every event at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl<K: Debug> CacheObserver<K> for TracingObserver {
    fn on_hit(&self, key: &K) {
        debug!(?key, "cache hit");
    }

    fn on_miss(&self, key: &K) {
        debug!(?key, "cache miss");
    }

    fn on_insert(&self, key: &K) {
        debug!(?key, "cache insert");
    }

    fn on_update(&self, key: &K) {
        debug!(?key, "cache update");
    }

    fn on_evict(&self, key: &K) {
        debug!(?key, "cache evict");
    }

    fn on_remove(&self, key: &K) {
        debug!(?key, "cache remove");
    }

    fn on_clear(&self, removed: usize) {
        debug!(removed, "cache clear");
    }
}
