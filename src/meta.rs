//! Algorithm-specific per-entry metadata.

/// Frequency metadata attached to every entry in an LFU cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfuMeta {
    /// Number of recorded accesses, subject to aging compression.
    pub frequency: usize,
}

impl LfuMeta {
    /// Creates metadata for a newly inserted entry, with frequency 1.
    pub fn new() -> Self {
        LfuMeta { frequency: 1 }
    }

    /// Increments the frequency counter by one.
    pub fn increment(&mut self) {
        self.frequency += 1;
    }
}

impl Default for LfuMeta {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_at_one() {
        assert_eq!(LfuMeta::new().frequency, 1);
    }

    #[test]
    fn test_increment() {
        let mut meta = LfuMeta::new();
        meta.increment();
        meta.increment();
        assert_eq!(meta.frequency, 3);
    }
}
