//! Unified cache entry type shared by all cache algorithms.
//!
//! The generic `M` parameter lets each algorithm attach its own per-entry
//! metadata (for example, LFU's frequency counter) without giving every
//! algorithm a bespoke entry struct. Algorithms that need no extra state
//! (LRU, LRU-K) use `M = ()`.

use core::fmt;

/// A key/value pair stored in a cache, with optional algorithm-specific metadata.
pub struct CacheEntry<K, V, M = ()> {
    /// The entry's key.
    pub key: K,
    /// The entry's value.
    pub value: V,
    /// Algorithm-specific metadata (e.g. an LFU frequency counter).
    pub metadata: Option<M>,
}

impl<K, V, M> CacheEntry<K, V, M> {
    /// Creates an entry with no metadata.
    pub fn new(key: K, value: V) -> Self {
        CacheEntry {
            key,
            value,
            metadata: None,
        }
    }

    /// Creates an entry carrying algorithm-specific metadata.
    pub fn with_metadata(key: K, value: V, metadata: M) -> Self {
        CacheEntry {
            key,
            value,
            metadata: Some(metadata),
        }
    }

    /// Returns a mutable reference to the metadata, if present.
    pub fn metadata_mut(&mut self) -> Option<&mut M> {
        self.metadata.as_mut()
    }
}

impl<K: Clone, V: Clone, M: Clone> Clone for CacheEntry<K, V, M> {
    fn clone(&self) -> Self {
        CacheEntry {
            key: self.key.clone(),
            value: self.value.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, M: fmt::Debug> fmt::Debug for CacheEntry<K, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("metadata", &self.metadata)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::LfuMeta;

    #[test]
    fn test_new_entry_has_no_metadata() {
        let entry: CacheEntry<&str, i32> = CacheEntry::new("a", 1);
        assert_eq!(entry.key, "a");
        assert_eq!(entry.value, 1);
        assert!(entry.metadata.is_none());
    }

    #[test]
    fn test_with_metadata() {
        let mut entry = CacheEntry::with_metadata("a", 1, LfuMeta::new());
        assert_eq!(entry.metadata_mut().unwrap().frequency, 1);
    }

    #[test]
    fn test_clone() {
        let entry = CacheEntry::with_metadata("a", 1, LfuMeta::new());
        let cloned = entry.clone();
        assert_eq!(cloned.key, entry.key);
        assert_eq!(cloned.value, entry.value);
        assert_eq!(
            cloned.metadata.unwrap().frequency,
            entry.metadata.unwrap().frequency
        );
    }
}
