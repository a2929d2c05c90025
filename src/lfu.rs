//! Least Frequently Used (LFU) cache.
//!
//! Entries are grouped into buckets keyed by access frequency
//! (`BTreeMap<usize, List<...>>`); eviction always pulls from the
//! lowest-keyed non-empty bucket. Within a bucket, entries are ordered by
//! insertion/last-touch recency, so ties break FIFO — the entry that has
//! sat longest at its frequency without being touched again is evicted
//! first.
//!
//! ```text
//! freq=1: [cold] <-> [new_item]  <- min_frequency, FIFO eviction end
//! freq=5: [item_a] <-> [item_b]
//! freq=10: [hot] <-> [warm]
//! ```
//!
//! # Aging
//!
//! A pure frequency count never forgets: an item popular early in a long
//! run keeps its lead forever, starving newer-but-currently-popular items.
//! This cache tracks a running average access count (total references
//! divided by live entry count) and, once that average exceeds
//! `max_average`, rescales every live entry's frequency down by
//! `max_average / 2` (floor at 1) and recomputes the minimum frequency
//! from scratch. `max_average = usize::MAX` (the default) effectively
//! disables aging.
//!
//! # Thread safety
//!
//! `LfuCache` guards all of its state behind a single internal
//! [`parking_lot::Mutex`]; every public method locks it for the duration
//! of the call.

extern crate alloc;

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use parking_lot::Mutex;

use crate::config::LfuCacheConfig;
use crate::entry::CacheEntry;
use crate::list::{Entry as Node, List};
use crate::meta::LfuMeta;
use crate::{DefaultHashBuilder, HashMap};

type Bucketed<K, V> = CacheEntry<K, V, LfuMeta>;

pub(crate) struct LfuCore<K, V, S = DefaultHashBuilder> {
    cap: usize,
    max_average: usize,
    min_frequency: usize,
    total_references: usize,
    map: HashMap<K, *mut Node<Bucketed<K, V>>, S>,
    frequency_lists: BTreeMap<usize, List<Bucketed<K, V>>>,
}

unsafe impl<K: Send, V: Send, S: Send> Send for LfuCore<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher + Default> LfuCore<K, V, S> {
    fn with_hasher(cap: usize, max_average: usize, hash_builder: S) -> Self {
        LfuCore {
            cap,
            max_average,
            min_frequency: 1,
            total_references: 0,
            map: HashMap::with_hasher(hash_builder),
            frequency_lists: BTreeMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LfuCore<K, V, S> {
    fn cap(&self) -> usize {
        self.cap
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Moves `node` to the next frequency bucket up, recording one
    /// reference and aging the whole cache if the running average has
    /// crossed `max_average`. Returns the entry's (possibly relocated)
    /// node pointer.
    fn touch(&mut self, node: *mut Node<Bucketed<K, V>>) -> *mut Node<Bucketed<K, V>> {
        // SAFETY: `node` comes from `self.map` and is live in `frequency_lists`.
        let old_freq = unsafe { (*node).get_value() }
            .metadata
            .map(|m| m.frequency)
            .unwrap_or(1);
        let new_freq = old_freq + 1;

        let boxed = self
            .frequency_lists
            .get_mut(&old_freq)
            .and_then(|list| unsafe { list.remove(node) })
            .expect("node must live in its recorded frequency bucket");
        let was_min_bucket_emptied = old_freq == self.min_frequency
            && self
                .frequency_lists
                .get(&old_freq)
                .map(List::is_empty)
                .unwrap_or(true);

        let raw = Box::into_raw(boxed);
        // SAFETY: `raw` is a live, non-sentinel, initialized entry we just detached.
        unsafe { (*raw).get_value_mut() }.metadata = Some(LfuMeta { frequency: new_freq });

        let cap = self.cap;
        let bucket = self
            .frequency_lists
            .entry(new_freq)
            .or_insert_with(|| List::new(cap));
        // SAFETY: `raw` was just detached from its old list and is unlinked.
        unsafe { bucket.attach_from_other_list(raw) };

        if was_min_bucket_emptied {
            self.recompute_min_frequency();
        }

        self.record_reference();
        raw
    }

    fn record_reference(&mut self) {
        self.total_references += 1;
        if self.map.is_empty() {
            return;
        }
        let average = self.total_references / self.map.len();
        if average > self.max_average {
            self.age_entries();
        }
    }

    /// Rescales every live entry's frequency down by `max_average / 2`
    /// (floor at 1) and rebuilds `min_frequency` from scratch.
    fn age_entries(&mut self) {
        let shift = self.max_average / 2;
        let nodes: Vec<*mut Node<Bucketed<K, V>>> = self.map.values().copied().collect();

        for node in nodes {
            // SAFETY: `node` comes from `self.map` and is live in `frequency_lists`.
            let old_freq = unsafe { (*node).get_value() }
                .metadata
                .map(|m| m.frequency)
                .unwrap_or(1);
            let new_freq = old_freq.saturating_sub(shift).max(1);
            if new_freq == old_freq {
                continue;
            }

            let boxed = self
                .frequency_lists
                .get_mut(&old_freq)
                .and_then(|list| unsafe { list.remove(node) })
                .expect("node must live in its recorded frequency bucket");
            let raw = Box::into_raw(boxed);
            // SAFETY: `raw` is a live, non-sentinel, initialized entry we just detached.
            unsafe { (*raw).get_value_mut() }.metadata = Some(LfuMeta { frequency: new_freq });

            let cap = self.cap;
            let bucket = self
                .frequency_lists
                .entry(new_freq)
                .or_insert_with(|| List::new(cap));
            // SAFETY: `raw` was just detached from its old list and is unlinked.
            unsafe { bucket.attach_from_other_list(raw) };
        }

        self.recompute_min_frequency();
    }

    /// Full rescan of every bucket for the lowest non-empty frequency.
    /// Falls back to `1` if the cache is empty.
    fn recompute_min_frequency(&mut self) {
        self.min_frequency = self
            .frequency_lists
            .iter()
            .find(|(_, list)| !list.is_empty())
            .map(|(&freq, _)| freq)
            .unwrap_or(1);
    }

    fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let &node = self.map.get(key)?;
        let new_node = self.touch(node);
        // SAFETY: `new_node` is the live, relocated entry just produced by `touch`.
        Some(&unsafe { (*new_node).get_value() }.value)
    }

    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let &node = self.map.get(key)?;
        let new_node = self.touch(node);
        // SAFETY: `new_node` is the live, relocated entry just produced by `touch`.
        Some(&mut unsafe { (*new_node).get_value_mut() }.value)
    }

    fn put(&mut self, key: K, value: V) {
        if self.cap == 0 {
            return;
        }

        if let Some(&node) = self.map.get(&key) {
            let new_node = self.touch(node);
            // SAFETY: `new_node` is the live, relocated entry just produced by `touch`.
            unsafe { (*new_node).get_value_mut() }.value = value;
            return;
        }

        if self.map.len() >= self.cap {
            self.evict_one();
        }

        let entry = CacheEntry::with_metadata(key.clone(), value, LfuMeta::new());
        let cap = self.cap;
        let bucket = self
            .frequency_lists
            .entry(1)
            .or_insert_with(|| List::new(cap));
        if let Some(node) = bucket.add(entry) {
            self.map.insert(key, node);
        }
        // A fresh insert always lands in bucket 1, which is now non-empty.
        self.min_frequency = 1;
        self.record_reference();
    }

    /// Evicts the FIFO-oldest entry in the lowest-frequency bucket.
    fn evict_one(&mut self) {
        let Some(list) = self.frequency_lists.get_mut(&self.min_frequency) else {
            return;
        };
        let Some(boxed) = list.remove_last() else {
            return;
        };
        // SAFETY: `boxed` was just detached and uniquely owned.
        let evicted = unsafe { boxed.get_value() };
        let evicted_freq = evicted.metadata.map(|m| m.frequency).unwrap_or(1);
        self.map.remove(&evicted.key);
        self.total_references = self.total_references.saturating_sub(evicted_freq);

        if list.is_empty() {
            self.recompute_min_frequency();
        }
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        let node = self.map.remove(key)?;
        // SAFETY: `node` comes from `self.map` and is live in `frequency_lists`.
        let freq = unsafe { (*node).get_value() }
            .metadata
            .map(|m| m.frequency)
            .unwrap_or(1);
        let bucket = self
            .frequency_lists
            .get_mut(&freq)
            .expect("node must live in its recorded frequency bucket");
        // SAFETY: `node` is a live member of `bucket`.
        let boxed = unsafe { bucket.remove(node) }.expect("node must be present in its bucket");
        // SAFETY: `boxed` is a uniquely-owned, initialized, non-sentinel entry.
        let value = unsafe { boxed.get_value() }.value.clone();
        self.total_references = self.total_references.saturating_sub(freq);

        if freq == self.min_frequency && bucket.is_empty() {
            self.recompute_min_frequency();
        }

        Some(value)
    }

    fn clear(&mut self) {
        self.map.clear();
        self.frequency_lists.clear();
        self.min_frequency = 1;
        self.total_references = 0;
    }
}

impl<K, V, S> fmt::Debug for LfuCore<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCore")
            .field("cap", &self.cap)
            .field("len", &self.map.len())
            .field("min_frequency", &self.min_frequency)
            .finish()
    }
}

/// A cache implementing the Least Frequently Used eviction policy, with
/// optional frequency aging.
pub struct LfuCache<K, V, S = DefaultHashBuilder> {
    core: Mutex<LfuCore<K, V, S>>,
}

impl<K, V, S> fmt::Debug for LfuCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.lock();
        f.debug_struct("LfuCache")
            .field("cap", &core.cap)
            .field("len", &core.map.len())
            .finish()
    }
}

impl<K: Hash + Eq, V> LfuCache<K, V, DefaultHashBuilder> {
    /// Creates a new LFU cache with aging effectively disabled.
    pub fn new(capacity: usize) -> Self {
        Self::from_config(LfuCacheConfig::new(capacity))
    }

    /// Creates a new LFU cache from a [`LfuCacheConfig`].
    pub fn from_config(config: LfuCacheConfig) -> Self {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> LfuCache<K, V, S> {
    /// Creates a new LFU cache with a custom hash builder.
    pub fn with_hasher(config: LfuCacheConfig, hash_builder: S) -> Self {
        LfuCache {
            core: Mutex::new(LfuCore::with_hasher(
                config.capacity,
                config.max_average,
                hash_builder,
            )),
        }
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> LfuCache<K, V, S> {
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

    /// Two-argument lookup: returns whether `key` is present, writing the
    /// current value into `out` on a hit. A hit increments the entry's
    /// frequency.
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
    /// `V::default()`.
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Default,
    {
        self.core.lock().get(key).cloned().unwrap_or_default()
    }

    /// Returns a cloned copy of the value for `key`, or `None` on a miss.
    /// A hit increments the entry's frequency.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.core.lock().get(key).cloned()
    }

    /// Calls `f` with a mutable reference to the value for `key`, without
    /// cloning it out. A hit increments the entry's frequency.
    pub fn get_mut_with<Q, R>(&self, key: &Q, f: impl FnOnce(&mut V) -> R) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.core.lock().get_mut(key).map(f)
    }

    /// Inserts or updates `key`. Treated as a reference either way: a
    /// fresh key starts at frequency 1, an existing key's frequency is
    /// incremented. At capacity, the FIFO-oldest entry in the
    /// lowest-frequency bucket is evicted.
    pub fn put(&self, key: K, value: V) {
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

    /// Removes all entries and resets aging statistics.
    pub fn purge(&self) {
        self.core.lock().clear();
    }
}
