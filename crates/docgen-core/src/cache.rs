//! Fixed-capacity LRU cache of artifact bytes
//!
//! One instance exists per cached artifact class. All operations take an
//! internal lock for the duration of a single map update, so the cache can be
//! shared across request tasks behind an `Arc` without outside
//! synchronization. `get`, `put` and `remove` are O(1): a hash index points
//! into a slab of nodes linked in recency order.

use crate::error::{DocgenError, Result};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Cached artifact content, shared between the cache and in-flight requests
pub type CachedBytes = Arc<[u8]>;

/// Statistics about cache usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries evicted to make room.
    pub evictions: u64,
    /// Number of entries currently in cache.
    pub len: usize,
    /// Configured capacity.
    pub capacity: usize,
}

struct Node {
    key: String,
    value: CachedBytes,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Map plus an intrusive recency list over a slab of nodes.
///
/// `head` is the most recently used entry and `tail` the next eviction
/// victim. Every operation is a hash lookup plus a constant number of link
/// updates.
#[derive(Default)]
struct LruState {
    index: HashMap<String, usize>,
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl LruState {
    fn node(&mut self, slot: usize) -> &mut Node {
        match self.nodes[slot].as_mut() {
            Some(node) => node,
            None => unreachable!("linked slot {} is vacant", slot),
        }
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = self.node(slot);
            (node.prev.take(), node.next.take())
        };
        match prev {
            Some(p) => self.node(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node(n).prev = prev,
            None => self.tail = prev,
        }
    }

    fn push_front(&mut self, slot: usize) {
        let old_head = self.head;
        {
            let node = self.node(slot);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => self.node(h).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    fn touch(&mut self, slot: usize) {
        if self.head != Some(slot) {
            self.unlink(slot);
            self.push_front(slot);
        }
    }

    fn insert(&mut self, key: String, value: CachedBytes) {
        let node = Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };
        self.index.insert(key, slot);
        self.push_front(slot);
    }

    fn take(&mut self, slot: usize) -> Option<Node> {
        self.unlink(slot);
        let node = self.nodes[slot].take()?;
        self.index.remove(&node.key);
        self.free.push(slot);
        Some(node)
    }
}

/// Bounded, thread-safe key → bytes store with least-recently-used eviction
pub struct BoundedCache {
    name: &'static str,
    capacity: usize,
    state: Mutex<LruState>,
}

impl BoundedCache {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is a configuration error.
    pub fn new(name: &'static str, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(DocgenError::Configuration(format!(
                "{} cache capacity must be at least 1",
                name
            )));
        }
        Ok(Self {
            name,
            capacity,
            state: Mutex::new(LruState::default()),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up a key, marking it most recently used on a hit
    pub fn get(&self, key: &str) -> Option<CachedBytes> {
        let mut state = self.state.lock();
        let Some(&slot) = state.index.get(key) else {
            state.misses += 1;
            return None;
        };
        state.touch(slot);
        state.hits += 1;
        Some(Arc::clone(&state.node(slot).value))
    }

    /// Insert or overwrite a key, evicting the least recently used entry when
    /// a new key would exceed capacity
    pub fn put(&self, key: impl Into<String>, value: CachedBytes) {
        let key = key.into();
        let mut state = self.state.lock();

        if let Some(&slot) = state.index.get(&key) {
            state.node(slot).value = value;
            state.touch(slot);
            return;
        }

        if state.index.len() >= self.capacity {
            let tail = state.tail;
            if let Some(oldest) = tail.and_then(|slot| state.take(slot)) {
                state.evictions += 1;
                tracing::debug!(cache = self.name, key = %oldest.key, "evicted least recently used entry");
            }
        }

        state.insert(key, value);
    }

    /// Drop a key if present. Returns whether an entry was removed.
    pub fn remove(&self, key: &str) -> bool {
        let mut state = self.state.lock();
        match state.index.get(key).copied() {
            Some(slot) => state.take(slot).is_some(),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().index.contains_key(key)
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
            len: state.index.len(),
            capacity: self.capacity,
        }
    }
}

impl std::fmt::Debug for BoundedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedCache")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}
