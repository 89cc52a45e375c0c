//! Deterministic utilities for reproducible training.
//!
//! A seeded LCG drives every random choice in the pipeline (shuffling,
//! resampling, row and column subsampling) so that a fixed seed always
//! yields an identical artifact.

use std::num::Wrapping;

/// Linear Congruential Generator for deterministic pseudo-randomness.
/// Uses constants from Numerical Recipes (glibc).
#[derive(Clone, Debug)]
pub struct LcgRng {
    state: Wrapping<i64>,
}

impl LcgRng {
    const MULTIPLIER: i64 = 1103515245;
    const INCREMENT: i64 = 12345;
    const MODULUS: i64 = 1 << 31;

    pub fn new(seed: u64) -> Self {
        Self {
            state: Wrapping((seed % Self::MODULUS as u64) as i64),
        }
    }

    /// Next raw value in [0, MODULUS).
    fn next_i64(&mut self) -> i64 {
        self.state = self.state * Wrapping(Self::MULTIPLIER) + Wrapping(Self::INCREMENT);
        (self.state.0 & (Self::MODULUS - 1)).abs()
    }

    /// Uniform index in [0, max). Returns 0 for an empty range.
    pub fn next_index(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_i64() as usize) % max
    }

    /// Fisher-Yates shuffle of a slice.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }

    /// Draw `count` distinct indices among [0, n), in ascending order.
    pub fn sample_without_replacement(&mut self, n: usize, count: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        self.shuffle(&mut indices);
        indices.truncate(count.min(n));
        indices.sort_unstable();
        indices
    }
}

/// Deterministic tie-breaker for split selection.
///
/// Totally ordered by (feature, threshold bits, node id) so equal-gain
/// splits resolve the same way on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SplitTieBreaker {
    pub feature_idx: usize,
    pub threshold_bits: u64,
    pub node_id: usize,
}

impl SplitTieBreaker {
    pub fn new(feature_idx: usize, threshold: f64, node_id: usize) -> Self {
        Self {
            feature_idx,
            // Flip the sign bit so bit order matches numeric order for
            // negative thresholds too.
            threshold_bits: threshold.to_bits() ^ (1 << 63),
            node_id,
        }
    }
}
