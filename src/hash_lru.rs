//! Hash-sharded LRU cache.
//!
//! Keys are routed to one of `N` independent [`LruCache`] shards by
//! `hash(key) % N`. Each shard is a complete, self-locking LRU cache with
//! its own capacity and its own eviction order; there is no recency
//! relationship *between* shards, and no lock guards the wrapper itself —
//! only the shard a given key lands in is ever touched.
//!
//! This trades strict global LRU ordering for near-linear scaling under
//! concurrent access: two threads touching keys that land in different
//! shards never contend.

use core::hash::{BuildHasher, Hash, Hasher};

use crate::config::HashLruCacheConfig;
use crate::lru::LruCache;
use crate::DefaultHashBuilder;

/// A cache that hash-partitions keys across independent [`LruCache`] shards.
pub struct HashLruCache<K, V, S = DefaultHashBuilder> {
    shards: Box<[LruCache<K, V, S>]>,
    hash_builder: S,
}

impl<K, V, S> core::fmt::Debug for HashLruCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashLruCache")
            .field("shard_count", &self.shards.len())
            .finish_non_exhaustive()
    }
}

fn resolve_shard_count(requested: usize) -> usize {
    if requested > 0 {
        requested
    } else {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

fn shard_capacity(total_capacity: usize, shard_count: usize) -> usize {
    total_capacity.div_ceil(shard_count)
}

impl<K: Hash + Eq, V> HashLruCache<K, V, DefaultHashBuilder> {
    /// Creates a new hash-sharded LRU cache. `shard_count <= 0` selects
    /// hardware parallelism as the shard count.
    pub fn new(total_capacity: usize, shard_count: isize) -> Self {
        Self::from_config(HashLruCacheConfig::new(total_capacity, shard_count))
    }

    /// Creates a new hash-sharded LRU cache from a [`HashLruCacheConfig`].
    pub fn from_config(config: HashLruCacheConfig) -> Self {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default + Clone> HashLruCache<K, V, S> {
    /// Creates a new hash-sharded LRU cache with a custom hash builder.
    /// The same hash builder both selects the shard and seeds every
    /// shard's own internal map.
    pub fn with_hasher(config: HashLruCacheConfig, hash_builder: S) -> Self {
        let shard_count = resolve_shard_count(config.shard_count);
        let per_shard_cap = shard_capacity(config.total_capacity, shard_count);
        let shards: Vec<_> = (0..shard_count)
            .map(|_| {
                LruCache::with_hasher(
                    crate::config::LruCacheConfig::new(per_shard_cap),
                    hash_builder.clone(),
                )
            })
            .collect();
        HashLruCache {
            shards: shards.into_boxed_slice(),
            hash_builder,
        }
    }
}

impl<K: Hash + Eq, V: Clone, S: BuildHasher> HashLruCache<K, V, S> {
    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_for(&self, key: &K) -> &LruCache<K, V, S> {
        let mut hasher = self.hash_builder.build_hasher();
        key.hash(&mut hasher);
        let index = (hasher.finish() as usize) % self.shards.len();
        &self.shards[index]
    }

    /// Returns the total configured capacity across all shards.
    pub fn cap(&self) -> usize {
        self.shards.iter().map(LruCache::cap).sum()
    }

    /// Returns the number of live entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(LruCache::len).sum()
    }

    /// Returns `true` if every shard is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(LruCache::is_empty)
    }

    /// Two-argument lookup: returns whether `key` is present, writing the
    /// current value into `out` on a hit.
    pub fn get_into(&self, key: &K, out: &mut V) -> bool {
        self.shard_for(key).get_into(key, out)
    }

    /// Convenience lookup returning the value directly, or `V::default()`
    /// on a miss.
    pub fn get_or_default(&self, key: &K) -> V
    where
        V: Default,
    {
        self.shard_for(key).get_or_default(key)
    }

    /// Returns a cloned copy of the value for `key`, or `None` on a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        self.shard_for(key).get(key)
    }

    /// Calls `f` with a mutable reference to the value for `key`, without
    /// cloning it out.
    pub fn get_mut_with<R>(&self, key: &K, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        self.shard_for(key).get_mut_with(key, f)
    }

    /// Inserts or updates `key` in its shard.
    pub fn put(&self, key: K, value: V)
    where
        K: Clone,
    {
        self.shard_for(&key).put(key, value);
    }

    /// Removes `key` from its shard, returning its value if present.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.shard_for(key).remove(key)
    }

    /// Removes all entries from every shard.
    pub fn purge(&self) {
        for shard in self.shards.iter() {
            shard.purge();
        }
    }
}
