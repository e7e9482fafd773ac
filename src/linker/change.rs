//! ChangeDetector: Content-Addressable Index Change Detection
//!
//! Hashes the terms of each TermIndex the conductor sees, so the compiled
//! LinkCortex is only rebuilt when the vocabulary actually changed. A
//! snapshot read back from the Term Cache hashes the same as the one that
//! was written, whatever its `built_at`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::linker::index::TermIndex;

/// Tracks the last TermIndex seen, by hash
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last_hash: Option<u64>,
    check_count: u64,
    skip_count: u64,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip rate as percentage
    pub fn skip_rate(&self) -> f64 {
        if self.check_count == 0 {
            return 0.0;
        }
        (self.skip_count as f64 / self.check_count as f64) * 100.0
    }

    /// Check an index against the last one seen; true if its terms differ
    pub fn check(&mut self, index: &TermIndex) -> bool {
        self.check_count += 1;

        let index_hash = Self::compute_hash(index);
        let has_changed = self.last_hash != Some(index_hash);
        if !has_changed {
            self.skip_count += 1;
        }

        self.last_hash = Some(index_hash);
        has_changed
    }

    fn compute_hash(index: &TermIndex) -> u64 {
        let mut hasher = DefaultHasher::new();
        index.entries().hash(&mut hasher);
        hasher.finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn index(pairs: Vec<(&str, &str)>) -> TermIndex {
        TermIndex::from_pairs(pairs)
    }

    // -------------------------------------------------------------------------
    // Requirement 1: First check always returns changed
    // -------------------------------------------------------------------------
    #[test]
    fn test_first_check_returns_changed() {
        let mut detector = ChangeDetector::new();
        assert!(detector.check(&index(vec![("Kora", "/k")])));
    }

    // -------------------------------------------------------------------------
    // Requirement 2: Same terms, rebuilt later, are unchanged
    // -------------------------------------------------------------------------
    #[test]
    fn test_rebuilt_snapshot_unchanged() {
        let mut detector = ChangeDetector::new();
        detector.check(&index(vec![("Kora", "/k")]));
        assert!(!detector.check(&index(vec![("Kora", "/k")])));
    }

    // -------------------------------------------------------------------------
    // Requirement 3: URL change counts as a change
    // -------------------------------------------------------------------------
    #[test]
    fn test_url_change_detected() {
        let mut detector = ChangeDetector::new();
        detector.check(&index(vec![("Kora", "/k")]));
        assert!(detector.check(&index(vec![("Kora", "/kora")])));
    }

    // -------------------------------------------------------------------------
    // Requirement 4: Skip rate
    // -------------------------------------------------------------------------
    #[test]
    fn test_skip_rate() {
        let mut detector = ChangeDetector::new();
        assert_eq!(detector.skip_rate(), 0.0);
        let idx = index(vec![("Kora", "/k")]);
        for _ in 0..4 {
            detector.check(&idx);
        }
        assert!((detector.skip_rate() - 75.0).abs() < 0.01);
    }
}
