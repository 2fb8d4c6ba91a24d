//! Shared Cache Module
//!
//! Lock-guarded handle for using one cache from many tasks.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::{CacheObserver, CacheStats, Insertion, LruCache, NoopObserver};
use crate::error::Result;

// == Shared Cache ==
/// Cloneable, thread-safe handle to a single [`LruCache`].
///
/// A `get` rewrites the recency order, so every operation takes the same
/// exclusive lock rather than a read/write lock. The guard lives only for the
/// cache call itself. Observer callbacks and the drop of evicted values run
/// after it is released.
pub struct SharedCache<K, V, O = NoopObserver> {
    inner: Arc<Mutex<LruCache<K, V>>>,
    observer: Arc<O>,
    capacity: usize,
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a shared cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_observer(capacity, NoopObserver)
    }
}

impl<K, V, O> SharedCache<K, V, O>
where
    K: Hash + Eq + Clone,
    O: CacheObserver<K>,
{
    /// Creates a shared cache that reports every operation to `observer`.
    pub fn with_observer(capacity: usize, observer: O) -> Result<Self> {
        let cache = LruCache::new(capacity)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(cache)),
            observer: Arc::new(observer),
            capacity,
        })
    }

    // == Get ==
    /// Returns a copy of the value for `key` and marks it most recently used.
    pub async fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let value = self.inner.lock().await.get(key).cloned();
        match value {
            Some(_) => self.observer.on_hit(key),
            None => self.observer.on_miss(key),
        }
        value
    }

    // == Put ==
    /// Stores `value` under `key`, evicting the least recently used entry if
    /// a new key does not fit.
    pub async fn put(&self, key: K, value: V) {
        self.insert(key, value).await;
    }

    /// Same as [`put`](Self::put), reporting what happened to the cache.
    pub async fn insert(&self, key: K, value: V) -> Insertion<K, V> {
        let outcome = self.inner.lock().await.insert(key.clone(), value);
        match &outcome {
            Insertion::Inserted => self.observer.on_insert(&key),
            Insertion::Replaced(_) => self.observer.on_update(&key),
            Insertion::Evicted(evicted, _) => {
                self.observer.on_evict(evicted);
                self.observer.on_insert(&key);
            }
        }
        outcome
    }

    // == Remove ==
    /// Removes `key`, returning its value. Absent keys are a no-op.
    pub async fn remove(&self, key: &K) -> Option<V> {
        let removed = self.inner.lock().await.remove(key);
        if removed.is_some() {
            self.observer.on_remove(key);
        }
        removed
    }

    // == Clear ==
    pub async fn clear(&self) {
        let removed = {
            let mut cache = self.inner.lock().await;
            let removed = cache.len();
            cache.clear();
            removed
        };
        self.observer.on_clear(removed);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Capacity is fixed at construction and needs no lock.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    pub async fn is_not_empty(&self) -> bool {
        self.inner.lock().await.is_not_empty()
    }

    pub async fn contains_key(&self, key: &K) -> bool {
        self.inner.lock().await.contains_key(key)
    }

    pub async fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.inner.lock().await.contains_value(value)
    }

    // == Snapshots ==
    /// Copies the current keys, least recently used first.
    pub async fn keys(&self) -> Vec<K> {
        self.inner.lock().await.keys().cloned().collect()
    }

    /// Copies the current values, least recently used first.
    pub async fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.inner.lock().await.values().cloned().collect()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }
}

impl<K, V, O> Clone for SharedCache<K, V, O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            observer: Arc::clone(&self.observer),
            capacity: self.capacity,
        }
    }
}

impl<K, V, O> fmt::Debug for SharedCache<K, V, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCache")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shared_new_rejects_zero_capacity() {
        assert!(SharedCache::<String, String>::new(0).is_err());
    }

    #[tokio::test]
    async fn test_shared_basic_operations() {
        let cache = SharedCache::new(2).unwrap();

        cache.put("a".to_string(), 1).await;
        cache.put("b".to_string(), 2).await;
        assert_eq!(cache.get(&"a".to_string()).await, Some(1));

        // "b" is now least recently used
        cache.put("c".to_string(), 3).await;

        assert_eq!(cache.len().await, 2);
        assert!(!cache.contains_key(&"b".to_string()).await);
        assert_eq!(cache.keys().await, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(cache.values().await, vec![1, 3]);
        assert!(cache.contains_value(&3).await);
    }

    #[tokio::test]
    async fn test_shared_clones_share_state() {
        let cache = SharedCache::new(4).unwrap();
        let other = cache.clone();

        other.put(1u32, "one").await;

        assert_eq!(cache.get(&1).await, Some("one"));
        assert_eq!(cache.remove(&1).await, Some("one"));
        assert!(other.is_empty().await);
    }

    #[tokio::test]
    async fn test_shared_clear_and_stats() {
        let cache = SharedCache::new(3).unwrap();

        cache.put(1, 10).await;
        cache.put(2, 20).await;
        cache.get(&1).await;
        cache.get(&9).await;
        cache.clear().await;

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.removals, 2);
        assert_eq!(stats.total_entries, 0);
        assert!(!cache.is_not_empty().await);
    }
}
