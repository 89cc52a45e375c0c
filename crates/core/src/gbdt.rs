//! Gradient Boosted Decision Tree (GBDT) evaluator.
//!
//! Inference walks each tree from the root, sums the stored leaf values
//! onto the base score, and maps the margin through a sigmoid to a
//! probability of the Unsafe class. Leaf values are already shrunk by the
//! learning rate at training time, so evaluation is a plain sum.

use serde::{Deserialize, Serialize};

use crate::schema::FeatureVector;

/// A decision tree node (internal or leaf)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Feature index to compare (for internal nodes)
    pub feature_index: u16,
    /// Threshold value for comparison
    pub threshold: f64,
    /// Index of left child node
    pub left: u16,
    /// Index of right child node
    pub right: u16,
    /// Leaf value (None for internal nodes, Some for leaves)
    pub value: Option<f64>,
}

/// A single decision tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Tree {
    /// Nodes in depth-first order; node 0 is the root
    pub nodes: Vec<Node>,
}

/// Complete GBDT binary classifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GbdtModel {
    /// Boosted trees, applied in order
    pub trees: Vec<Tree>,
    /// Initial log-odds of the Unsafe class
    pub base_score: f64,
}

impl Tree {
    /// Evaluate the tree on a feature vector.
    ///
    /// Malformed trees (dangling child index, out-of-range feature index,
    /// cyclic child links) contribute 0 rather than panicking or looping.
    pub fn eval(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;

        // A well-formed walk visits each node at most once.
        for _ in 0..self.nodes.len() {
            let node = match self.nodes.get(idx) {
                Some(node) => node,
                None => return 0.0,
            };

            if let Some(value) = node.value {
                return value;
            }

            let feature_idx = node.feature_index as usize;
            if feature_idx >= features.len() {
                return 0.0;
            }

            idx = if features[feature_idx] <= node.threshold {
                node.left as usize
            } else {
                node.right as usize
            };
        }

        0.0
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl GbdtModel {
    /// Raw additive score (log-odds) for a feature vector.
    pub fn predict_margin(&self, features: &FeatureVector) -> f64 {
        let mut sum = self.base_score;
        for tree in &self.trees {
            sum += tree.eval(features);
        }
        sum
    }

    /// Probability of the Unsafe class, in [0, 1].
    pub fn predict_proba(&self, features: &FeatureVector) -> f64 {
        sigmoid(self.predict_margin(features)).clamp(0.0, 1.0)
    }
}
