//! Configuration for [`LruCache`](crate::LruCache).

/// Configuration for an LRU (Least Recently Used) cache.
///
/// A `capacity` of `0` is valid: the constructed cache accepts no entries.
#[derive(Debug, Clone, Copy)]
pub struct LruCacheConfig {
    /// Maximum number of live key-value pairs the cache holds.
    pub capacity: usize,
}

impl LruCacheConfig {
    /// Creates a new LRU cache configuration.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}
