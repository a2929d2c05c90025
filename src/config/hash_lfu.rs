//! Configuration for [`HashLfuCache`](crate::HashLfuCache).

/// Configuration for a hash-sharded LFU cache.
///
/// `shard_count <= 0` selects hardware parallelism as the shard count.
/// `max_average` is forwarded to every shard's [`LfuCacheConfig`](crate::config::LfuCacheConfig).
#[derive(Debug, Clone, Copy)]
pub struct HashLfuCacheConfig {
    /// Total capacity across all shards (approximate — see module docs).
    pub total_capacity: usize,
    /// Number of shards. `0` means "auto": hardware parallelism.
    pub shard_count: usize,
    /// Aging threshold forwarded to every shard.
    pub max_average: usize,
}

impl HashLfuCacheConfig {
    /// Creates a configuration with aging effectively disabled per shard.
    pub fn new(total_capacity: usize, shard_count: isize) -> Self {
        Self {
            total_capacity,
            shard_count: if shard_count > 0 {
                shard_count as usize
            } else {
                0
            },
            max_average: usize::MAX,
        }
    }

    /// Creates a configuration with an explicit per-shard aging threshold.
    pub fn with_max_average(total_capacity: usize, shard_count: isize, max_average: usize) -> Self {
        assert!(max_average >= 1, "LFU `max_average` must be >= 1");
        Self {
            total_capacity,
            shard_count: if shard_count > 0 {
                shard_count as usize
            } else {
                0
            },
            max_average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_shard_count() {
        let config = HashLfuCacheConfig::new(100, 4);
        assert_eq!(config.shard_count, 4);
        assert_eq!(config.max_average, usize::MAX);
    }

    #[test]
    fn test_non_positive_shard_count_means_auto() {
        assert_eq!(HashLfuCacheConfig::new(100, 0).shard_count, 0);
    }
}
