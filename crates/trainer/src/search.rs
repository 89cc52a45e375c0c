//! Hyperparameter grid search under stratified cross-validation.
//!
//! The scorer is deliberately asymmetric: recall of the Safe class, so the
//! search penalizes false Unsafe calls on safe water. Grid points are
//! scored by k-fold stratified CV and ties go to the earlier grid point.

use waterwise_core::schema::Label;

use crate::boost::{GbdtParams, GbdtTrainer};
use crate::dataset::Dataset;
use crate::deterministic::LcgRng;
use crate::errors::{Result, TrainerError};
use crate::metrics::recall;

/// Probability cut used while scoring folds; final threshold calibration
/// happens separately against the held-out test split.
const CV_PROBABILITY_CUT: f64 = 0.5;

/// Finite candidate sets for the tuned hyperparameters.
#[derive(Clone, Debug)]
pub struct HyperGrid {
    pub max_depth: Vec<usize>,
    pub learning_rate: Vec<f64>,
    pub subsample: Vec<f64>,
    pub colsample: Vec<f64>,
}

impl Default for HyperGrid {
    fn default() -> Self {
        Self {
            max_depth: vec![3, 4, 6],
            learning_rate: vec![0.05, 0.1, 0.3],
            subsample: vec![0.8, 1.0],
            colsample: vec![0.8, 1.0],
        }
    }
}

impl HyperGrid {
    /// Expand the grid into concrete parameter sets, in a fixed order.
    pub fn expand(&self, base: &GbdtParams) -> Vec<GbdtParams> {
        let mut out = Vec::new();
        for &max_depth in &self.max_depth {
            for &learning_rate in &self.learning_rate {
                for &subsample in &self.subsample {
                    for &colsample in &self.colsample {
                        out.push(GbdtParams {
                            max_depth,
                            learning_rate,
                            subsample,
                            colsample,
                            ..base.clone()
                        });
                    }
                }
            }
        }
        out
    }
}

/// Stratified k-fold assignment: per-class shuffle, then round-robin deal
/// so every fold preserves the class ratio as closely as counts allow.
pub fn stratified_kfold(labels: &[u8], k: usize, seed: u64) -> Vec<(Vec<usize>, Vec<usize>)> {
    let mut fold_of = vec![0usize; labels.len()];
    let mut rng = LcgRng::new(seed);

    for class in [0u8, 1u8] {
        let mut class_idx: Vec<usize> = (0..labels.len()).filter(|&i| labels[i] == class).collect();
        rng.shuffle(&mut class_idx);
        for (pos, &row) in class_idx.iter().enumerate() {
            fold_of[row] = pos % k;
        }
    }

    (0..k)
        .map(|fold| {
            let mut train = Vec::new();
            let mut val = Vec::new();
            for (row, &f) in fold_of.iter().enumerate() {
                if f == fold {
                    val.push(row);
                } else {
                    train.push(row);
                }
            }
            (train, val)
        })
        .collect()
}

/// Outcome of a grid search.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub params: GbdtParams,
    /// Mean Safe-class recall across folds
    pub score: f64,
}

/// Cross-validated grid search over the balanced training split.
///
/// Fails with `InsufficientData` if the grid is empty or `k` exceeds the
/// minority-class row count.
pub fn grid_search(
    dataset: &Dataset,
    grid: &HyperGrid,
    base: &GbdtParams,
    k: usize,
) -> Result<SearchResult> {
    let candidates = grid.expand(base);
    if candidates.is_empty() {
        return Err(TrainerError::InsufficientData(
            "hyperparameter grid is empty".into(),
        ));
    }
    if k < 2 {
        return Err(TrainerError::InsufficientData(format!(
            "cross-validation needs at least 2 folds, got {k}"
        )));
    }

    let (safe, unsafe_count) = dataset.class_counts();
    let minority = safe.min(unsafe_count);
    if minority < k {
        return Err(TrainerError::InsufficientData(format!(
            "{k} folds but only {minority} minority-class rows"
        )));
    }

    let folds = stratified_kfold(&dataset.labels, k, base.seed);
    let mut best: Option<SearchResult> = None;

    for (grid_idx, params) in candidates.into_iter().enumerate() {
        let mut fold_scores = Vec::with_capacity(folds.len());

        for (train_idx, val_idx) in &folds {
            let train = dataset.subset(train_idx);
            let val = dataset.subset(val_idx);

            let model = GbdtTrainer::new(params.clone()).train(&train);
            let predicted: Vec<u8> = val
                .features
                .iter()
                .map(|fv| u8::from(model.predict_proba(fv) > CV_PROBABILITY_CUT))
                .collect();

            fold_scores.push(recall(&val.labels, &predicted, Label::Safe.class_index()));
        }

        let score = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
        tracing::debug!(
            grid_idx,
            max_depth = params.max_depth,
            learning_rate = params.learning_rate,
            subsample = params.subsample,
            colsample = params.colsample,
            score,
            "grid point scored"
        );

        // Strict comparison keeps the earliest grid point on ties.
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(SearchResult { params, score });
        }
    }

    let result = best.ok_or_else(|| {
        TrainerError::InsufficientData("no grid point could be scored".into())
    })?;
    tracing::info!(
        score = result.score,
        max_depth = result.params.max_depth,
        learning_rate = result.params.learning_rate,
        subsample = result.params.subsample,
        colsample = result.params.colsample,
        "grid search selected configuration"
    );

    Ok(result)
}
