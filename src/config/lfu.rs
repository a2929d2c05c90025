//! Configuration for [`LfuCache`](crate::LfuCache).

/// Configuration for an LFU (Least Frequently Used) cache.
///
/// `max_average` is the aging threshold: once the running average access
/// frequency exceeds it, every entry's frequency is compressed (see the
/// `lfu` module docs). Defaults to `usize::MAX`, which effectively
/// disables aging — an explicit, small value should be supplied by callers
/// that want long-lived keys to stop dominating the cache.
#[derive(Debug, Clone, Copy)]
pub struct LfuCacheConfig {
    /// Maximum number of live key-value pairs the cache holds.
    pub capacity: usize,
    /// Aging threshold for the running average access frequency.
    pub max_average: usize,
}

impl LfuCacheConfig {
    /// Creates a configuration with aging effectively disabled
    /// (`max_average = usize::MAX`).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            max_average: usize::MAX,
        }
    }

    /// Creates a configuration with an explicit aging threshold.
    ///
    /// # Panics
    ///
    /// Panics if `max_average < 1`.
    pub fn with_max_average(capacity: usize, max_average: usize) -> Self {
        assert!(max_average >= 1, "LFU `max_average` must be >= 1");
        Self {
            capacity,
            max_average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_disables_aging() {
        let config = LfuCacheConfig::new(100);
        assert_eq!(config.capacity, 100);
        assert_eq!(config.max_average, usize::MAX);
    }

    #[test]
    fn test_with_max_average() {
        let config = LfuCacheConfig::with_max_average(100, 4);
        assert_eq!(config.max_average, 4);
    }

    #[test]
    #[should_panic(expected = "max_average")]
    fn test_zero_max_average_panics() {
        LfuCacheConfig::with_max_average(100, 0);
    }
}
