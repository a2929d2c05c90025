//! Least Recently Used (LRU) cache.
//!
//! An LRU cache evicts the least recently accessed item once it reaches
//! capacity. Lookups and insertions are O(1): a hash map gives O(1) node
//! lookup, and an intrusive doubly-linked list gives O(1) detach/reattach
//! for recency bookkeeping.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  HashMap<K, *Node>          Doubly-Linked List              │
//! │  ┌──────────────┐          ┌────────────────────────────┐  │
//! │  │ "apple"  ───────────────▶ MRU ◀──▶ ... ◀──▶ LRU       │  │
//! │  │ "banana" ───────────────▶  ▲                   │      │  │
//! │  │ "cherry" ───────────────▶  │                   ▼      │  │
//! │  └──────────────┘          head                 tail     │  │
//! │                            └────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Eviction example
//!
//! ```text
//! capacity 3
//! put("a", 1)  →  [a]
//! put("b", 2)  →  [b, a]
//! put("c", 3)  →  [c, b, a]
//! get("a")     →  [a, c, b]   // "a" moved to MRU
//! put("d", 4)  →  [d, a, c]   // "b" evicted (was LRU)
//! ```
//!
//! # Thread safety
//!
//! `LruCache` guards all of its state behind a single internal
//! [`parking_lot::Mutex`]; every public method locks it for the duration of
//! the call. There is no lock-free variant.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

use parking_lot::Mutex;

use crate::config::LruCacheConfig;
use crate::entry::CacheEntry;
use crate::list::{Entry as Node, List};
use crate::{DefaultHashBuilder, HashMap};

/// Internal, non-synchronized LRU bookkeeping: map + intrusive recency list.
///
/// Split out from [`LruCache`] so that the locking discipline lives in
/// exactly one place (the public wrapper) while this type stays a plain,
/// single-threaded data structure.
pub(crate) struct LruCore<K, V, S = DefaultHashBuilder> {
    list: List<CacheEntry<K, V>>,
    map: HashMap<K, *mut Node<CacheEntry<K, V>>, S>,
}

// SAFETY: the raw pointers stored in `map` always point at nodes owned by
// `list` and never escape the module; sending the whole struct to another
// thread is sound whenever K/V/S are themselves Send.
unsafe impl<K: Send, V: Send, S: Send> Send for LruCore<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher + Default> LruCore<K, V, S> {
    fn with_hasher(capacity: usize, hash_builder: S) -> Self {
        LruCore {
            list: List::new(capacity),
            map: HashMap::with_hasher(hash_builder),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCore<K, V, S> {
    fn cap(&self) -> usize {
        self.list.cap()
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let &node = self.map.get(key)?;
        unsafe {
            // SAFETY: node came from our own map and is live in `list`.
            self.list.move_to_front(node);
            Some(&(*node).get_value().value)
        }
    }

    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let &node = self.map.get(key)?;
        unsafe {
            // SAFETY: node came from our own map and is live in `list`.
            self.list.move_to_front(node);
            Some(&mut (*node).get_value_mut().value)
        }
    }

    fn put(&mut self, key: K, value: V)
    where
        K: Clone,
    {
        if let Some(&node) = self.map.get(&key) {
            unsafe {
                // SAFETY: node came from our own map and is live in `list`.
                self.list.move_to_front(node);
                (*node).get_value_mut().value = value;
            }
            return;
        }

        if self.list.is_full() {
            if let Some(evicted) = self.list.remove_last() {
                // SAFETY: remove_last only ever returns a live, non-sigil node.
                let evicted_key = &unsafe { evicted.get_value() }.key;
                self.map.remove(evicted_key);
            }
        }

        let entry = CacheEntry::new(key.clone(), value);
        if let Some(node) = self.list.add(entry) {
            self.map.insert(key, node);
        }
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        let node = self.map.remove(key)?;
        unsafe {
            // SAFETY: node was owned by our map and is live in `list`.
            let value = (*node).get_value().value.clone();
            self.list.remove(node);
            Some(value)
        }
    }

    fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
    }
}

impl<K, V, S> fmt::Debug for LruCore<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("capacity", &self.list.cap())
            .field("len", &self.map.len())
            .finish()
    }
}

/// A Least Recently Used cache.
///
/// # Examples
///
/// ```
/// use kvcache::LruCache;
///
/// let cache = LruCache::new(2);
/// cache.put("a", 1);
/// cache.put("b", 2);
/// assert_eq!(cache.get(&"a"), Some(1));
///
/// cache.put("c", 3); // evicts "b", the least recently used key
/// assert_eq!(cache.get(&"b"), None);
/// ```
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    core: Mutex<LruCore<K, V, S>>,
}

impl<K: Hash + Eq, V, S: BuildHasher> fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.lock();
        f.debug_struct("LruCache")
            .field("capacity", &core.cap())
            .field("len", &core.len())
            .finish()
    }
}

impl<K: Hash + Eq, V> LruCache<K, V, DefaultHashBuilder> {
    /// Creates a new LRU cache with the given capacity.
    ///
    /// A capacity of `0` is valid: every `put` is a no-op and every `get`
    /// misses.
    pub fn new(capacity: usize) -> Self {
        Self::from_config(LruCacheConfig::new(capacity))
    }

    /// Creates a new LRU cache from a [`LruCacheConfig`].
    pub fn from_config(config: LruCacheConfig) -> Self {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> LruCache<K, V, S> {
    /// Creates a new LRU cache with a custom hash builder.
    pub fn with_hasher(config: LruCacheConfig, hash_builder: S) -> Self {
        LruCache {
            core: Mutex::new(LruCore::with_hasher(config.capacity, hash_builder)),
        }
    }
}

impl<K: Hash + Eq, V: Clone, S: BuildHasher> LruCache<K, V, S> {
    /// Returns the cache's configured capacity.
    pub fn cap(&self) -> usize {
        self.core.lock().cap()
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.core.lock().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.core.lock().is_empty()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Returns `true` if `key` is present. A hit moves the entry to the MRU
    /// position, the same as any other read.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.core.lock().get(key).is_some()
    }
}

impl<K: Hash + Eq, V: Clone, S: BuildHasher> LruCache<K, V, S> {
    /// Two-argument lookup: returns whether `key` is present, writing the
    /// current value into `out` on a hit. A hit moves the entry to the MRU
    /// position.
    pub fn get_into<Q>(&self, key: &Q, out: &mut V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.core.lock().get(key) {
            Some(value) => {
                *out = value.clone();
                true
            }
            None => false,
        }
    }

    /// Convenience lookup returning the value directly. On miss, returns
    /// `V::default()` — indistinguishable from a hit whose value happens to
    /// be the default. Callers that need presence should use
    /// [`LruCache::get_into`] or [`LruCache::get`].
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Default,
    {
        self.core.lock().get(key).cloned().unwrap_or_default()
    }

    /// Returns a cloned copy of the value for `key`, or `None` on a miss.
    /// A hit moves the entry to the MRU position.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.core.lock().get(key).cloned()
    }

    /// Calls `f` with a mutable reference to the value for `key`, without
    /// cloning it out. A hit moves the entry to the MRU position.
    pub fn get_mut_with<Q, R>(&self, key: &Q, f: impl FnOnce(&mut V) -> R) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.core.lock().get_mut(key).map(f)
    }

    /// Inserts or updates `key`. On update, the value is overwritten and
    /// the entry is moved to the MRU position. On insert at capacity,
    /// exactly one entry — the LRU one — is evicted.
    pub fn put(&self, key: K, value: V)
    where
        K: Clone,
    {
        self.core.lock().put(key, value);
    }

    /// Removes `key`, returning its value if present. A no-op if absent.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.core.lock().remove(key)
    }

    /// Removes all entries. The cache behaves as freshly constructed afterward.
    pub fn purge(&self) {
        self.core.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_put_get() {
        let cache = LruCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"b"), Some(2));
    }

    #[test]
    fn test_zero_capacity_is_always_a_miss() {
        let cache: LruCache<&str, i32> = LruCache::new(0);
        cache.put("a", 1);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_scenario_s1_eviction_order() {
        // spec S1: capacity 3, put 1/2/3, get(1), put(4) evicts 2.
        let cache = LruCache::new(3);
        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");
        assert_eq!(cache.get(&1), Some("a"));
        cache.put(4, "d");

        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some("a"));
        assert_eq!(cache.get(&3), Some("c"));
        assert_eq!(cache.get(&4), Some("d"));
    }

    #[test]
    fn test_scenario_s2_update_refreshes_recency() {
        // spec S2: capacity 2, put 1/2, update 1, put 3 evicts 2.
        let cache = LruCache::new(2);
        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(1, "A");
        cache.put(3, "c");

        assert_eq!(cache.get(&1), Some("A"));
        assert_eq!(cache.get(&3), Some("c"));
        assert_eq!(cache.get(&2), None);
    }

    #[test]
    fn test_remove() {
        let cache = LruCache::new(2);
        cache.put("key", 42);
        assert_eq!(cache.remove(&"key"), Some(42));
        assert_eq!(cache.remove(&"key"), None);
    }

    #[test]
    fn test_purge() {
        let cache = LruCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.purge();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(&"a"), None);
    }

    #[test]
    fn test_capacity_one_evicts_previous_on_every_put() {
        let cache = LruCache::new(1);
        cache.put(1, "a");
        cache.put(2, "b");
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some("b"));
    }

    #[test]
    fn test_get_mut_with() {
        let cache = LruCache::new(2);
        cache.put("a", 1);
        cache.get_mut_with(&"a", |v| *v += 10);
        assert_eq!(cache.get(&"a"), Some(11));
    }
}
