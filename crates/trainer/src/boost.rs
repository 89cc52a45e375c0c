//! Gradient boosting over CART trees with logistic loss.
//!
//! Trains the binary Safe/Unsafe classifier: the model output is the
//! log-odds of the Unsafe class, mapped to a probability by the core
//! evaluator. All randomness (row and column subsampling) comes from the
//! seeded LCG, so a fixed seed reproduces the model exactly.

use waterwise_core::gbdt::GbdtModel;
use waterwise_core::schema::FEATURE_COUNT;

use crate::cart::{CartBuilder, TreeConfig};
use crate::dataset::Dataset;
use crate::deterministic::LcgRng;

/// GBDT training hyperparameters. The grid search varies `max_depth`,
/// `learning_rate`, `subsample`, and `colsample`.
#[derive(Clone, Debug, PartialEq)]
pub struct GbdtParams {
    pub num_trees: usize,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    pub learning_rate: f64,
    /// Fraction of training rows sampled per tree
    pub subsample: f64,
    /// Fraction of feature columns sampled per tree
    pub colsample: f64,
    pub lambda: f64,
    pub seed: u64,
}

impl Default for GbdtParams {
    fn default() -> Self {
        Self {
            num_trees: 50,
            max_depth: 4,
            min_samples_leaf: 2,
            learning_rate: 0.1,
            subsample: 1.0,
            colsample: 1.0,
            lambda: 1.0,
            seed: 42,
        }
    }
}

/// GBDT trainer
pub struct GbdtTrainer {
    params: GbdtParams,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl GbdtTrainer {
    pub fn new(params: GbdtParams) -> Self {
        Self { params }
    }

    /// Train a GBDT model on the given labeled dataset.
    pub fn train(&self, dataset: &Dataset) -> GbdtModel {
        let n = dataset.len();
        let mut rng = LcgRng::new(self.params.seed);

        let base_score = self.initial_log_odds(&dataset.labels);
        let mut margins = vec![base_score; n];

        let rows_per_tree = ((n as f64 * self.params.subsample).floor() as usize).clamp(1, n);
        let cols_per_tree = ((FEATURE_COUNT as f64 * self.params.colsample).ceil() as usize)
            .clamp(1, FEATURE_COUNT);

        let mut trees = Vec::with_capacity(self.params.num_trees);

        for tree_idx in 0..self.params.num_trees {
            let (gradients, hessians) = self.gradients_hessians(&dataset.labels, &margins);

            let rows = rng.sample_without_replacement(n, rows_per_tree);
            let cols = rng.sample_without_replacement(FEATURE_COUNT, cols_per_tree);

            let tree_config = TreeConfig {
                max_depth: self.params.max_depth,
                min_samples_leaf: self.params.min_samples_leaf,
                lambda: self.params.lambda,
                leaf_shrinkage: self.params.learning_rate,
            };

            let builder =
                CartBuilder::new(&dataset.features, &gradients, &hessians, &cols, tree_config);
            let tree = builder.build(&rows);

            // Leaves are already shrunk by the learning rate.
            for (i, feature_vec) in dataset.features.iter().enumerate() {
                margins[i] += tree.eval(feature_vec);
            }

            tracing::debug!(
                tree = tree_idx + 1,
                total = self.params.num_trees,
                nodes = tree.nodes.len(),
                "boosting round complete"
            );

            trees.push(tree);
        }

        GbdtModel { trees, base_score }
    }

    /// Initial margin: log-odds of the Unsafe class in the training labels.
    fn initial_log_odds(&self, labels: &[u8]) -> f64 {
        if labels.is_empty() {
            return 0.0;
        }
        let positives = labels.iter().filter(|&&l| l == 1).count() as f64;
        let p = (positives / labels.len() as f64).clamp(1e-6, 1.0 - 1e-6);
        (p / (1.0 - p)).ln()
    }

    /// Logistic loss: gradient = p - y, hessian = p * (1 - p).
    fn gradients_hessians(&self, labels: &[u8], margins: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut gradients = Vec::with_capacity(labels.len());
        let mut hessians = Vec::with_capacity(labels.len());

        for (&label, &margin) in labels.iter().zip(margins) {
            let p = sigmoid(margin);
            gradients.push(p - f64::from(label));
            hessians.push((p * (1.0 - p)).max(1e-16));
        }

        (gradients, hessians)
    }
}
