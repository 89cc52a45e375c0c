//! Decision-threshold calibration against the held-out test split.
//!
//! Decoupled from model fitting: the same fitted classifier can be
//! recalibrated against a new trade-off without retraining.

use serde::Serialize;
use waterwise_core::gbdt::GbdtModel;

use crate::dataset::Dataset;
use crate::metrics::recall;

/// Candidate thresholds, swept in ascending order.
const SWEEP: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];

/// Per-threshold calibration record, kept for the training report.
#[derive(Clone, Debug, Serialize)]
pub struct ThresholdScore {
    pub threshold: f64,
    pub recall_safe: f64,
    pub recall_unsafe: f64,
}

impl ThresholdScore {
    pub fn combined(&self) -> f64 {
        self.recall_safe + self.recall_unsafe
    }
}

/// Sweep candidate thresholds and pick the one maximizing the sum of
/// per-class recalls. Ties resolve to the lowest threshold, which is the
/// more conservative operating point (quicker to declare Unsafe).
pub fn select_threshold(model: &GbdtModel, test: &Dataset) -> (f64, Vec<ThresholdScore>) {
    let probabilities: Vec<f64> = test
        .features
        .iter()
        .map(|fv| model.predict_proba(fv))
        .collect();

    let scores: Vec<ThresholdScore> = SWEEP
        .iter()
        .map(|&threshold| {
            let predicted: Vec<u8> = probabilities
                .iter()
                .map(|&p| u8::from(p > threshold))
                .collect();

            ThresholdScore {
                threshold,
                recall_safe: recall(&test.labels, &predicted, 0),
                recall_unsafe: recall(&test.labels, &predicted, 1),
            }
        })
        .collect();

    // Strict comparison keeps the first (lowest) threshold on ties.
    let mut best = &scores[0];
    for s in &scores[1..] {
        if s.combined() > best.combined() {
            best = s;
        }
    }

    tracing::info!(
        threshold = best.threshold,
        recall_safe = best.recall_safe,
        recall_unsafe = best.recall_unsafe,
        "threshold calibrated"
    );

    (best.threshold, scores)
}
