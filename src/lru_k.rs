//! Least Recently Used, K-th reference (LRU-K) cache.
//!
//! LRU-K delays admission into the main cache until a key has been
//! referenced `k` times. Until then, accesses are tracked in a bounded
//! history list (key -> reference count) and the associated value sits in
//! an unbounded staging map. Once the `k`-th reference lands, the key is
//! promoted: it leaves history/staging and enters the main LRU cache.
//!
//! This defends the main cache against pollution from one-off accesses —
//! a single scan through cold keys never evicts hot, repeatedly-referenced
//! ones, unlike plain LRU.
//!
//! # Thread safety
//!
//! A single [`parking_lot::Mutex`] owned by `LruKCache` is the outer lock.
//! Every public method acquires it first, then calls into the main cache
//! (acquiring its own internal lock) and, if needed, the history cache
//! (acquiring its own internal lock) — always in that order: outer, main,
//! history.

use core::fmt;
use core::hash::{BuildHasher, Hash};

use parking_lot::Mutex;

use crate::config::LruKCacheConfig;
use crate::lru::LruCache;
use crate::{DefaultHashBuilder, HashMap};

struct LruKCore<K, V, S = DefaultHashBuilder> {
    main: LruCache<K, V, S>,
    history: LruCache<K, usize, S>,
    staging: HashMap<K, V, S>,
    k: usize,
}

/// A cache implementing the LRU-K admission policy.
pub struct LruKCache<K, V, S = DefaultHashBuilder> {
    inner: Mutex<LruKCore<K, V, S>>,
}

impl<K, V, S> fmt::Debug for LruKCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruKCache").finish_non_exhaustive()
    }
}

impl<K: Hash + Eq, V> LruKCache<K, V, DefaultHashBuilder> {
    /// Creates a new LRU-K cache.
    pub fn new(capacity: usize, history_capacity: usize, k: usize) -> Self {
        Self::from_config(LruKCacheConfig::new(capacity, history_capacity, k))
    }

    /// Creates a new LRU-K cache from a [`LruKCacheConfig`].
    pub fn from_config(config: LruKCacheConfig) -> Self {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default + Clone> LruKCache<K, V, S> {
    /// Creates a new LRU-K cache with a custom hash builder.
    pub fn with_hasher(config: LruKCacheConfig, hash_builder: S) -> Self {
        LruKCache {
            inner: Mutex::new(LruKCore {
                main: LruCache::with_hasher(
                    crate::config::LruCacheConfig::new(config.capacity),
                    hash_builder.clone(),
                ),
                history: LruCache::with_hasher(
                    crate::config::LruCacheConfig::new(config.history_capacity),
                    hash_builder.clone(),
                ),
                staging: HashMap::with_hasher(hash_builder),
                k: config.k,
            }),
        }
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> LruKCache<K, V, S> {
    /// Returns the main cache's configured capacity.
    pub fn cap(&self) -> usize {
        self.inner.lock().main.cap()
    }

    /// Returns the number of entries that have been promoted into the main
    /// cache. Keys still pending in history/staging are not counted.
    pub fn len(&self) -> usize {
        self.inner.lock().main.len()
    }

    /// Returns `true` if the main cache holds no promoted entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().main.is_empty()
    }

    /// Two-argument lookup: returns whether `key` is present in the main
    /// cache, writing its value into `out` on a hit. A miss still counts as
    /// a reference toward promotion.
    pub fn get_into(&self, key: &K, out: &mut V) -> bool {
        match self.get(key) {
            Some(value) => {
                *out = value;
                true
            }
            None => false,
        }
    }

    /// Convenience lookup returning the value directly, or `V::default()`
    /// on a miss.
    pub fn get_or_default(&self, key: &K) -> V
    where
        V: Default,
    {
        self.get(key).unwrap_or_default()
    }

    /// Looks up `key`.
    ///
    /// If `key` is already promoted, this is a plain main-cache hit and
    /// returns immediately without touching history or staging (deviation
    /// from the reference implementation, which always bumps history —
    /// see `DESIGN.md`).
    ///
    /// On a main-cache miss, the reference count in history is
    /// incremented. If it now meets `k` and a staged value exists, the key
    /// is promoted into the main cache and that value is returned.
    /// Otherwise the miss is reported.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut core = self.inner.lock();
        if let Some(value) = core.main.get(key) {
            return Some(value);
        }
        let count = core.history.get(key).unwrap_or(0) + 1;
        core.history.put(key.clone(), count);
        if count >= core.k {
            if let Some(value) = core.staging.remove(key) {
                core.history.remove(key);
                core.main.put(key.clone(), value.clone());
                return Some(value);
            }
        }
        None
    }

    /// Inserts or updates `key`.
    ///
    /// If `key` is already promoted, the main cache is updated directly.
    /// Otherwise this counts as a reference: the history count is
    /// incremented and `value` is (re-)staged. If the count now meets `k`,
    /// the key is promoted immediately with this value.
    pub fn put(&self, key: K, value: V) {
        let mut core = self.inner.lock();
        if core.main.contains_key(&key) {
            core.main.put(key, value);
            return;
        }
        let count = core.history.get(&key).unwrap_or(0) + 1;
        core.history.put(key.clone(), count);
        core.staging.insert(key.clone(), value.clone());
        if count >= core.k {
            core.staging.remove(&key);
            core.history.remove(&key);
            core.main.put(key, value);
        }
    }

    /// Removes `key` from wherever it lives (main, or history/staging).
    /// Returns its value if it had been promoted into the main cache.
    /// Unpromoted keys are dropped silently, matching the "miss is
    /// invisible" contract.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut core = self.inner.lock();
        core.history.remove(key);
        core.staging.remove(key);
        core.main.remove(key)
    }

    /// Removes all entries from the main cache, history, and staging.
    pub fn purge(&self) {
        let mut core = self.inner.lock();
        core.main.purge();
        core.history.purge();
        core.staging.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_put_does_not_promote() {
        let cache: LruKCache<i32, &str> = LruKCache::new(2, 10, 2);
        cache.put(4, "d");
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_scenario_s3_promotion_gate() {
        let cache: LruKCache<i32, &str> = LruKCache::new(2, 10, 2);

        cache.put(1, "a");
        assert_eq!(cache.get(&1), Some("a"));

        cache.put(2, "b");
        assert_eq!(cache.get(&2), Some("b"));
        assert_eq!(cache.len(), 2);

        cache.put(3, "c");
        assert_eq!(cache.get(&3), Some("c"));
        // Capacity 2: promoting 3 evicts the oldest promoted key, 1.
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some("b"));
        assert_eq!(cache.get(&3), Some("c"));
    }

    #[test]
    fn test_k_one_degenerates_to_immediate_promotion() {
        let cache: LruKCache<i32, &str> = LruKCache::new(2, 10, 1);
        cache.put(1, "a");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some("a"));
    }

    #[test]
    fn test_repeated_get_without_put_eventually_promotes() {
        let cache: LruKCache<i32, i32> = LruKCache::new(2, 10, 3);
        assert_eq!(cache.get(&7), None);
        assert_eq!(cache.get(&7), None);
        // Third reference meets k, but there is no staged value (no put
        // ever occurred) so there is nothing to promote.
        assert_eq!(cache.get(&7), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_zero_capacity_main_never_promotes_visibly() {
        let cache: LruKCache<i32, &str> = LruKCache::new(0, 10, 1);
        cache.put(1, "a");
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_remove_unpromoted_key_is_noop() {
        let cache: LruKCache<i32, &str> = LruKCache::new(2, 10, 5);
        cache.put(1, "a");
        assert_eq!(cache.remove(&1), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_remove_promoted_key() {
        let cache: LruKCache<i32, &str> = LruKCache::new(2, 10, 1);
        cache.put(1, "a");
        assert_eq!(cache.remove(&1), Some("a"));
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn test_purge_clears_everything() {
        let cache: LruKCache<i32, &str> = LruKCache::new(2, 10, 2);
        cache.put(1, "a");
        cache.put(2, "b");
        cache.get(&2);
        cache.purge();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(&2), None);
    }
}
