//! Concurrent append-only multimap.

use dashmap::DashMap;
use smallvec::SmallVec;
use std::hash::Hash;

/// Values pushed under one key.
pub type Bucket<V> = SmallVec<[V; 4]>;

/// Many-writer accumulator: workers push values under a destination key
/// and a later phase folds each key's bucket.
///
/// Pushing only locks the shard owning the key, so independent work
/// items writing different destinations rarely contend. Storage is kept
/// across [`MultiMap::clear`] and grown only through
/// [`MultiMap::ensure_capacity`].
#[derive(Debug)]
pub struct MultiMap<K: Eq + Hash, V> {
    inner: DashMap<K, Bucket<V>>,
}

impl<K: Eq + Hash, V> MultiMap<K, V> {
    /// An empty map.
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// An empty map with room for `keys` distinct keys.
    pub fn with_capacity(keys: usize) -> Self {
        Self {
            inner: DashMap::with_capacity(keys),
        }
    }

    /// Append `value` under `key`. Safe to call from many threads.
    pub fn push(&self, key: K, value: V) {
        self.inner.entry(key).or_default().push(value);
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether nothing was pushed.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Whether `key` has at least one value.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of values pushed under `key`.
    pub fn count(&self, key: &K) -> usize {
        self.inner.get(key).map_or(0, |b| b.len())
    }

    /// Drop all entries, keeping storage.
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Current key capacity.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Reallocate if fewer than `keys` keys fit. Returns whether it did.
    ///
    /// Contents are dropped on reallocation. Never shrinks.
    pub fn ensure_capacity(&mut self, keys: usize) -> bool {
        if self.inner.capacity() >= keys {
            return false;
        }
        self.inner = DashMap::with_capacity(keys);
        true
    }
}

impl<K: Eq + Hash, V: Copy + std::iter::Sum<V>> MultiMap<K, V> {
    /// Sum of the values under `key`, or `None` if nothing was pushed.
    pub fn sum(&self, key: &K) -> Option<V> {
        self.inner
            .get(key)
            .map(|b| b.value().iter().copied().sum())
    }
}

impl<K: Eq + Hash, V> Default for MultiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
