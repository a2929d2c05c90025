//! Hash-sharded LFU cache.
//!
//! Keys are routed to one of `N` independent [`LfuCache`] shards by
//! `hash(key) % N`, exactly as [`HashLruCache`](crate::HashLruCache) does
//! for LRU. Each shard tracks its own frequencies, its own minimum, and
//! ages independently — there is no global frequency ordering across
//! shards, and the wrapper holds no lock of its own.

use core::hash::{BuildHasher, Hash, Hasher};

use crate::config::HashLfuCacheConfig;
use crate::lfu::LfuCache;
use crate::DefaultHashBuilder;

/// A cache that hash-partitions keys across independent [`LfuCache`] shards.
pub struct HashLfuCache<K, V, S = DefaultHashBuilder> {
    shards: Box<[LfuCache<K, V, S>]>,
    hash_builder: S,
}

impl<K, V, S> core::fmt::Debug for HashLfuCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashLfuCache")
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

impl<K: Hash + Eq, V> HashLfuCache<K, V, DefaultHashBuilder> {
    /// Creates a new hash-sharded LFU cache with aging effectively
    /// disabled per shard. `shard_count <= 0` selects hardware
    /// parallelism as the shard count.
    pub fn new(total_capacity: usize, shard_count: isize) -> Self {
        Self::from_config(HashLfuCacheConfig::new(total_capacity, shard_count))
    }

    /// Creates a new hash-sharded LFU cache from a [`HashLfuCacheConfig`].
    pub fn from_config(config: HashLfuCacheConfig) -> Self {
        Self::with_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default + Clone> HashLfuCache<K, V, S> {
    /// Creates a new hash-sharded LFU cache with a custom hash builder.
    pub fn with_hasher(config: HashLfuCacheConfig, hash_builder: S) -> Self {
        let shard_count = resolve_shard_count(config.shard_count);
        let per_shard_cap = shard_capacity(config.total_capacity, shard_count);
        let shards: Vec<_> = (0..shard_count)
            .map(|_| {
                LfuCache::with_hasher(
                    crate::config::LfuCacheConfig::with_max_average(
                        per_shard_cap,
                        config.max_average,
                    ),
                    hash_builder.clone(),
                )
            })
            .collect();
        HashLfuCache {
            shards: shards.into_boxed_slice(),
            hash_builder,
        }
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> HashLfuCache<K, V, S> {
    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_for(&self, key: &K) -> &LfuCache<K, V, S> {
        let mut hasher = self.hash_builder.build_hasher();
        key.hash(&mut hasher);
        let index = (hasher.finish() as usize) % self.shards.len();
        &self.shards[index]
    }

    /// Returns the total configured capacity across all shards.
    pub fn cap(&self) -> usize {
        self.shards.iter().map(LfuCache::cap).sum()
    }

    /// Returns the number of live entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(LfuCache::len).sum()
    }

    /// Returns `true` if every shard is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(LfuCache::is_empty)
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
    pub fn put(&self, key: K, value: V) {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_put_get() {
        let cache: HashLfuCache<i32, i32> = HashLfuCache::new(100, 4);
        cache.put(1, 10);
        assert_eq!(cache.get(&1), Some(10));
    }

    #[test]
    fn test_explicit_shard_count_is_respected() {
        let cache: HashLfuCache<i32, i32> = HashLfuCache::new(100, 4);
        assert_eq!(cache.shard_count(), 4);
    }

    #[test]
    fn test_zero_shard_count_falls_back_to_hardware_parallelism() {
        let cache: HashLfuCache<i32, i32> = HashLfuCache::new(100, 0);
        assert!(cache.shard_count() >= 1);
    }

    #[test]
    fn test_remove_and_purge() {
        let cache: HashLfuCache<i32, i32> = HashLfuCache::new(100, 4);
        cache.put(1, 10);
        cache.put(2, 20);
        assert_eq!(cache.remove(&1), Some(10));
        assert_eq!(cache.remove(&1), None);
        cache.purge();
        assert_eq!(cache.get(&2), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_per_shard_capacity_bounds_total() {
        let cache: HashLfuCache<i32, i32> = HashLfuCache::new(10, 4);
        for i in 0..100 {
            cache.put(i, i);
        }
        assert!(cache.len() <= 12);
    }
}
