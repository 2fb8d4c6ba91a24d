//! Cache Statistics Module
//!
//! Tracks lookup outcomes and entry churn for a single cache instance.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing how a cache has been used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that found their key
    pub hits: u64,
    /// Lookups that did not find their key
    pub misses: u64,
    /// Puts that added a new key
    pub inserts: u64,
    /// Puts that replaced the value of an existing key
    pub updates: u64,
    /// Entries dropped to make room for a new key
    pub evictions: u64,
    /// Entries dropped by `remove` or `clear`
    pub removals: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates zeroed counters for a cache of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of lookups recorded.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Removals ==
    /// Adds `count` removed entries; `clear` records all of them at once.
    pub fn record_removals(&mut self, count: usize) {
        self.removals += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
