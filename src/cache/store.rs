//! Cache Store Module
//!
//! Main cache engine combining HashMap lookup with the LRU recency list.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::mem;

use tracing::debug;

use crate::cache::lru::LruList;
use crate::cache::{CacheEntry, CacheObserver, CacheStats, NoopObserver};
use crate::error::{CacheError, Result};

// == Insertion ==
/// Outcome of [`LruCache::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion<K, V> {
    /// The key was new and the cache had room
    Inserted,
    /// The key existed; carries the value it held before
    Replaced(V),
    /// The key was new and this least recently used entry made room for it
    Evicted(K, V),
}

// == LRU Cache ==
/// Bounded key-value cache that evicts the least recently used entry.
///
/// Holds at most `capacity` entries. Reading an entry with [`get`](Self::get)
/// or writing it with [`put`](Self::put) makes it the most recently used.
/// Inserting a new key into a full cache first evicts the entry that has gone
/// longest without being touched.
///
/// The cache is single-owner: every operation that changes recency takes
/// `&mut self`. Use [`SharedCache`](crate::cache::SharedCache) to share one
/// instance between tasks.
pub struct LruCache<K, V, O = NoopObserver> {
    /// Key to slot index in `list`
    map: HashMap<K, usize>,
    /// Entries in recency order
    list: LruList<K, V>,
    stats: CacheStats,
    capacity: usize,
    observer: O,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_observer(capacity, NoopObserver)
    }
}

impl<K, V, O> LruCache<K, V, O>
where
    K: Hash + Eq + Clone,
    O: CacheObserver<K>,
{
    /// Creates a new cache that reports every operation to `observer`.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_observer(capacity: usize, observer: O) -> Result<Self> {
        if capacity < 1 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        debug!(capacity, "LRU cache created");

        Ok(Self {
            map: HashMap::new(),
            list: LruList::new(),
            stats: CacheStats::new(capacity),
            capacity,
            observer,
        })
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = self.lookup(key)?;
        self.list.get(idx).map(|entry| &entry.value)
    }

    /// Like [`get`](Self::get), but returns a mutable reference.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.lookup(key)?;
        self.list.get_mut(idx).map(|entry| &mut entry.value)
    }

    // == Peek ==
    /// Returns the value for `key` without touching recency or stats.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.list.get(idx).map(|entry| &entry.value)
    }

    /// Returns the entry that the next overflowing insert would evict.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.peek_oldest().map(CacheEntry::as_pair)
    }

    // == Put ==
    /// Stores `value` under `key`.
    ///
    /// An existing key keeps its slot, gets the new value and becomes most
    /// recently used. A new key evicts the least recently used entry first
    /// when the cache is full.
    pub fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    /// Same as [`put`](Self::put), reporting what happened to the cache.
    pub fn insert(&mut self, key: K, value: V) -> Insertion<K, V> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some(entry) = self.list.get_mut(idx) {
                let previous = mem::replace(&mut entry.value, value);
                self.list.touch(idx);
                self.stats.record_update();
                self.observer.on_update(&key);
                return Insertion::Replaced(previous);
            }
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        self.observer.on_insert(&key);
        let idx = self.list.push_front(key.clone(), value);
        self.map.insert(key, idx);
        self.stats.record_insert();

        debug_assert!(self.map.len() <= self.capacity);
        debug_assert_eq!(self.map.len(), self.list.len());

        match evicted {
            Some((key, value)) => Insertion::Evicted(key, value),
            None => Insertion::Inserted,
        }
    }

    // == Remove ==
    /// Removes `key`, returning its value. Absent keys are a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        let entry = self.list.remove(idx)?;
        self.stats.record_removals(1);
        self.observer.on_remove(key);
        Some(entry.value)
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&mut self) {
        let removed = self.list.len();
        self.map.clear();
        self.list.clear();
        self.stats.record_removals(removed);
        self.observer.on_clear(removed);
        debug!(removed, "LRU cache cleared");
    }

    // == Length ==
    /// Returns the current number of entries, always within `0..=capacity`.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    // == Contains ==
    /// Checks for `key` without changing its recency.
    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Scans every value for one equal to `value`; recency is unchanged.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    // == Iteration ==
    /// Iterates entries from least to most recently used.
    ///
    /// The order is exposed for inspection only; iterating does not change it.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> + '_ {
        self.list.iter().map(CacheEntry::as_pair)
    }

    /// Current keys, one per entry.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Current values, one per entry.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.len());
        stats
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Finds `key`, promotes it and records the lookup outcome.
    fn lookup(&mut self, key: &K) -> Option<usize> {
        match self.map.get(key) {
            Some(&idx) => {
                self.list.touch(idx);
                self.stats.record_hit();
                self.observer.on_hit(key);
                Some(idx)
            }
            None => {
                self.stats.record_miss();
                self.observer.on_miss(key);
                None
            }
        }
    }

    fn evict_oldest(&mut self) -> Option<(K, V)> {
        let entry = self.list.evict_oldest()?;
        self.map.remove(&entry.key);
        self.stats.record_eviction();
        self.observer.on_evict(&entry.key);
        Some(entry.into_pair())
    }
}

impl<K, V, O> fmt::Debug for LruCache<K, V, O>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.list.len())
            .field("keys", &self.list.iter().map(|e| &e.key).collect::<Vec<_>>())
            .finish()
    }
}
