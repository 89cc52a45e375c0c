//! CSV dataset loading and preparation.
//!
//! Normalizes the header to the canonical schema (the lab export uses
//! inconsistent spellings), drops rows that cannot be labeled, derives the
//! binary safety label from the microbial fields, and provides a seeded
//! train/test split.

use std::path::Path;

use waterwise_core::schema::{FeatureVector, Label, FEATURE_COLUMNS, MICROBIAL_COLUMNS};

use crate::deterministic::LcgRng;
use crate::errors::{Result, TrainerError};

/// A labeled, model-ready dataset.
#[derive(Clone, Debug)]
pub struct Dataset {
    /// Feature rows in canonical column order
    pub features: Vec<FeatureVector>,
    /// Class index per row (Safe = 0, Unsafe = 1)
    pub labels: Vec<u8>,
    /// Rows present in the source file
    pub rows_read: usize,
    /// Rows dropped for missing values
    pub rows_dropped: usize,
}

/// Normalize a raw header cell to canonical form: trim, lowercase, and
/// collapse whitespace / separator runs into single underscores.
fn normalize_column(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;

    for ch in raw.trim().chars() {
        if ch.is_whitespace() || ch == '-' || ch == '.' || ch == '_' {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push('_');
                pending_sep = false;
            }
            out.extend(ch.to_lowercase());
        }
    }

    out
}

/// Map known source-specific spellings onto the canonical schema.
fn canonical_name(normalized: &str) -> &str {
    match normalized {
        "ph" | "ph_level" => "ph",
        "tempreture" => "temperature",
        "electrcal_conductivity" | "electrical_conductivity" => "conductivity",
        "e_coli" | "ecoli" => "e_coli",
        other => other,
    }
}

fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl Dataset {
    /// Load and prepare a labeled dataset from a CSV file with a header row.
    ///
    /// Rows missing either microbial value cannot be labeled and are
    /// dropped; rows missing any feature value are dropped as well. Fails
    /// if a required column is absent, fewer than 2 usable rows remain, or
    /// only one class is present.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut lines = content.lines().enumerate();

        let (_, header) = lines
            .next()
            .ok_or_else(|| TrainerError::Schema("file is empty, expected a header row".into()))?;

        let columns: Vec<String> = header
            .split(',')
            .map(|c| canonical_name(&normalize_column(c)).to_string())
            .collect();

        let find = |name: &str| columns.iter().position(|c| c == name);

        let mut feature_idx = [0usize; FEATURE_COLUMNS.len()];
        let mut missing = Vec::new();
        for (i, name) in FEATURE_COLUMNS.iter().enumerate() {
            match find(name) {
                Some(idx) => feature_idx[i] = idx,
                None => missing.push(*name),
            }
        }

        let microbial_idx: Vec<Option<usize>> =
            MICROBIAL_COLUMNS.iter().map(|name| find(name)).collect();
        for (name, idx) in MICROBIAL_COLUMNS.iter().zip(&microbial_idx) {
            if idx.is_none() {
                missing.push(*name);
            }
        }

        if !missing.is_empty() {
            return Err(TrainerError::Schema(format!(
                "required columns missing after normalization: {} (found: {})",
                missing.join(", "),
                columns.join(", ")
            )));
        }
        let missing_microbial =
            |name: &str| TrainerError::Schema(format!("column '{name}' vanished after check"));
        let coliforms_idx =
            microbial_idx[0].ok_or_else(|| missing_microbial(MICROBIAL_COLUMNS[0]))?;
        let e_coli_idx = microbial_idx[1].ok_or_else(|| missing_microbial(MICROBIAL_COLUMNS[1]))?;

        let mut features = Vec::new();
        let mut labels = Vec::new();
        let mut rows_read = 0usize;
        let mut rows_dropped = 0usize;

        for (line_no, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            rows_read += 1;

            let cells: Vec<&str> = line.split(',').collect();
            if cells.len() != columns.len() {
                return Err(TrainerError::Parse(format!(
                    "line {}: expected {} cells, got {}",
                    line_no + 1,
                    columns.len(),
                    cells.len()
                )));
            }

            let coliforms = parse_cell(cells[coliforms_idx]);
            let e_coli = parse_cell(cells[e_coli_idx]);

            let mut row = [0.0f64; FEATURE_COLUMNS.len()];
            let mut complete = true;
            for (slot, &idx) in row.iter_mut().zip(feature_idx.iter()) {
                match parse_cell(cells[idx]) {
                    Some(v) => *slot = v,
                    None => {
                        complete = false;
                        break;
                    }
                }
            }

            match (coliforms, e_coli, complete) {
                (Some(tc), Some(ec), true) => {
                    features.push(row);
                    labels.push(Label::derive(tc, ec).class_index());
                }
                _ => rows_dropped += 1,
            }
        }

        let dataset = Self {
            features,
            labels,
            rows_read,
            rows_dropped,
        };

        let (safe, unsafe_count) = dataset.class_counts();
        tracing::info!(
            rows_read,
            rows_dropped,
            usable = dataset.len(),
            safe,
            unsafe_rows = unsafe_count,
            "dataset prepared"
        );

        if dataset.len() < 2 {
            return Err(TrainerError::EmptyDataset(format!(
                "{} usable rows after cleaning ({} read, {} dropped); need at least 2",
                dataset.len(),
                rows_read,
                rows_dropped
            )));
        }
        if safe == 0 || unsafe_count == 0 {
            return Err(TrainerError::EmptyDataset(format!(
                "single-class dataset (Safe: {safe}, Unsafe: {unsafe_count}); \
                 cannot train a binary classifier"
            )));
        }

        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Row counts per class: (Safe, Unsafe).
    pub fn class_counts(&self) -> (usize, usize) {
        let unsafe_count = self.labels.iter().filter(|&&l| l == 1).count();
        (self.labels.len() - unsafe_count, unsafe_count)
    }

    /// Deterministic stratified split into (train, test).
    ///
    /// Each class is shuffled and split separately so both slices keep
    /// both classes whenever a class has at least 2 rows; a singleton
    /// class stays entirely in the train slice. The test split stays
    /// untouched by balancing so threshold calibration sees the true
    /// class distribution.
    pub fn train_test_split(&self, test_fraction: f64, seed: u64) -> (Dataset, Dataset) {
        let mut rng = LcgRng::new(seed);
        let mut train_idx = Vec::new();
        let mut test_idx = Vec::new();

        for class in [0u8, 1u8] {
            let mut class_idx: Vec<usize> =
                (0..self.len()).filter(|&i| self.labels[i] == class).collect();
            rng.shuffle(&mut class_idx);

            let n_class = class_idx.len();
            let n_test = if n_class < 2 {
                0
            } else {
                ((n_class as f64 * test_fraction).round() as usize).clamp(1, n_class - 1)
            };

            let (test_part, train_part) = class_idx.split_at(n_test);
            test_idx.extend_from_slice(test_part);
            train_idx.extend_from_slice(train_part);
        }

        rng.shuffle(&mut train_idx);
        rng.shuffle(&mut test_idx);

        (self.subset(&train_idx), self.subset(&test_idx))
    }

    /// Select the given rows into a new dataset.
    pub(crate) fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: indices.iter().map(|&i| self.features[i]).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            rows_read: indices.len(),
            rows_dropped: 0,
        }
    }
}
