// src/cache.rs
//! Entry-bounded LRU cache.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// LRU cache holding at most `capacity` entries.
///
/// Recency is a monotonically increasing tick; `order` maps ticks back to keys
/// so the oldest entry is always the first one in the tree.
#[derive(Debug)]
pub struct LruCache<K: Hash + Eq + Clone, V: Clone> {
    capacity: usize,
    entries: HashMap<K, CacheEntry<V>>,
    order: BTreeMap<u64, K>,
    tick: u64,
    hits: u64,
    misses: u64,
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    last_used: u64,
}

impl<K: Hash + Eq + Clone, V: Clone> LruCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity.min(1 << 16)),
            order: BTreeMap::new(),
            tick: 0,
            hits: 0,
            misses: 0,
        }
    }

    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.tick += 1;
        let tick = self.tick;
        match self.entries.get_mut(key) {
            Some(entry) => {
                self.hits += 1;
                if let Some(k) = self.order.remove(&entry.last_used) {
                    self.order.insert(tick, k);
                }
                entry.last_used = tick;
                Some(entry.value.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn put(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        self.tick += 1;
        let tick = self.tick;

        if let Some(old) = self.entries.remove(&key) {
            self.order.remove(&old.last_used);
        }
        while self.entries.len() >= self.capacity {
            self.evict_lru();
        }

        self.order.insert(tick, key.clone());
        self.entries.insert(
            key,
            CacheEntry {
                value,
                last_used: tick,
            },
        );
    }

    fn evict_lru(&mut self) {
        if let Some((_, key)) = self.order.pop_first() {
            self.entries.remove(&key);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
