//! Cache Entry Module
//!
//! Defines the node stored in each slot of the recency list.

// == Cache Entry ==
/// A single cached key-value pair plus its recency links.
///
/// Links are slot indices into the owning [`LruList`](super::lru::LruList):
/// `prev` points toward the most recently used end, `next` toward the least.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<K, V> {
    /// The key, duplicated from the lookup map so eviction can unmap it
    pub key: K,
    /// The stored value
    pub value: V,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates an unlinked entry.
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
        }
    }

    // == Is Linked ==
    /// Returns true if the entry has a neighbour on either side.
    pub fn is_linked(&self) -> bool {
        self.prev.is_some() || self.next.is_some()
    }

    /// Returns the key and value as a borrowed pair.
    pub fn as_pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    /// Consumes the entry, dropping its links.
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}
