//! LRU List Module
//!
//! Implements the recency order used for least recently used eviction.

use crate::cache::entry::CacheEntry;

// == LRU List ==
/// Doubly linked list of cache entries stored in a slab of slots.
///
/// Entries are addressed by slot index, which stays stable until the entry is
/// removed. Freed slots are reused by later insertions.
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Every operation is O(1).
#[derive(Debug)]
pub(crate) struct LruList<K, V> {
    slots: Vec<Option<CacheEntry<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K, V> LruList<K, V> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Stores a new entry as the most recently used and returns its slot.
    pub fn push_front(&mut self, key: K, value: V) -> usize {
        let entry = CacheEntry::new(key, value);
        debug_assert!(!entry.is_linked());

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                idx
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };

        self.link_front(idx);
        self.len += 1;
        idx
    }

    // == Touch ==
    /// Marks a slot as most recently used.
    ///
    /// Unknown slots are ignored.
    pub fn touch(&mut self, idx: usize) {
        if self.head == Some(idx) || !self.contains(idx) {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    // == Remove ==
    /// Unlinks a slot and returns its entry.
    pub fn remove(&mut self, idx: usize) -> Option<CacheEntry<K, V>> {
        if !self.contains(idx) {
            return None;
        }
        self.unlink(idx);

        let entry = self.slots.get_mut(idx)?.take()?;
        self.free.push(idx);
        self.len -= 1;
        Some(entry)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn evict_oldest(&mut self) -> Option<CacheEntry<K, V>> {
        let idx = self.tail?;
        self.remove(idx)
    }

    // == Peek Oldest ==
    /// Returns the least recently used entry without removing it.
    pub fn peek_oldest(&self) -> Option<&CacheEntry<K, V>> {
        self.tail.and_then(|idx| self.get(idx))
    }

    pub fn get(&self, idx: usize) -> Option<&CacheEntry<K, V>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut CacheEntry<K, V>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.get(idx).is_some()
    }

    // == Length ==
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every entry and releases the slot storage.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // == Iterate ==
    /// Iterates entries from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.tail,
            remaining: self.len,
        }
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(entry) = self.get_mut(idx) {
            entry.prev = None;
            entry.next = old_head;
        }

        match old_head {
            Some(head) => {
                if let Some(entry) = self.get_mut(head) {
                    entry.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.get(idx) {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };

        match prev {
            Some(prev) => {
                if let Some(entry) = self.get_mut(prev) {
                    entry.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next) => {
                if let Some(entry) = self.get_mut(next) {
                    entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(entry) = self.get_mut(idx) {
            entry.prev = None;
            entry.next = None;
        }
    }
}

impl<K, V> Default for LruList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// == Iterator ==
/// Walks an [`LruList`] from tail to head.
pub(crate) struct Iter<'a, K, V> {
    list: &'a LruList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a CacheEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.list.get(self.cursor?)?;
        self.cursor = entry.prev;
        self.remaining = self.remaining.saturating_sub(1);
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
