//! Configuration for [`LruKCache`](crate::LruKCache).

/// Configuration for an LRU-K cache.
///
/// `k` is the number of observed accesses a key must accrue in the
/// history/staging area before it is promoted into the main cache.
#[derive(Debug, Clone, Copy)]
pub struct LruKCacheConfig {
    /// Capacity of the main (promoted) cache.
    pub capacity: usize,
    /// Capacity of the history cache tracking per-key access counts.
    pub history_capacity: usize,
    /// Accesses required before promotion. Must be `>= 1`.
    pub k: usize,
}

impl LruKCacheConfig {
    /// Creates a new LRU-K configuration.
    ///
    /// # Panics
    ///
    /// Panics if `k < 1`.
    pub fn new(capacity: usize, history_capacity: usize, k: usize) -> Self {
        assert!(k >= 1, "LRU-K promotion threshold `k` must be >= 1");
        Self {
            capacity,
            history_capacity,
            k,
        }
    }
}
