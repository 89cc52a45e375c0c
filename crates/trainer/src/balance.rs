//! Minority oversampling for the training split.
//!
//! Duplicated minority rows are permitted: the oversampling trades some
//! overfitting risk for balanced recall. Must never touch the test split.

use crate::dataset::Dataset;
use crate::deterministic::LcgRng;
use crate::errors::{Result, TrainerError};

/// Resample the minority class with replacement up to the majority count,
/// then shuffle the combined rows with the given seed.
///
/// Every majority row appears exactly once; output class counts are equal.
/// Fails with `InsufficientData` when a class is absent: there is no
/// minority to resample from.
pub fn oversample_minority(dataset: &Dataset, seed: u64) -> Result<Dataset> {
    let (safe, unsafe_count) = dataset.class_counts();
    if safe == 0 || unsafe_count == 0 {
        return Err(TrainerError::InsufficientData(format!(
            "cannot balance a single-class training split \
             (Safe: {safe}, Unsafe: {unsafe_count})"
        )));
    }

    let minority_class: u8 = if safe <= unsafe_count { 0 } else { 1 };

    let minority_idx: Vec<usize> = (0..dataset.len())
        .filter(|&i| dataset.labels[i] == minority_class)
        .collect();
    let majority_len = dataset.len() - minority_idx.len();

    let mut rng = LcgRng::new(seed);

    let mut features = dataset.features.clone();
    let mut labels = dataset.labels.clone();

    // Draw with replacement until the classes are even.
    for _ in minority_idx.len()..majority_len {
        let pick = minority_idx[rng.next_index(minority_idx.len())];
        features.push(dataset.features[pick]);
        labels.push(dataset.labels[pick]);
    }

    let mut order: Vec<usize> = (0..features.len()).collect();
    rng.shuffle(&mut order);

    let balanced = Dataset {
        features: order.iter().map(|&i| features[i]).collect(),
        labels: order.iter().map(|&i| labels[i]).collect(),
        rows_read: features.len(),
        rows_dropped: 0,
    };

    let (safe, unsafe_count) = balanced.class_counts();
    tracing::info!(safe, unsafe_rows = unsafe_count, "training split balanced");

    Ok(balanced)
}
