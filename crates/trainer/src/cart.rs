//! CART (Classification and Regression Tree) builder.
//!
//! Deterministic exact-greedy construction over gradient/hessian pairs,
//! with split candidates at midpoints of the sorted unique feature values
//! and tie-breaking by (feature, threshold, node id).

use waterwise_core::gbdt::{Node, Tree};
use waterwise_core::schema::FeatureVector;

use crate::deterministic::SplitTieBreaker;

/// Training parameters for a single tree
#[derive(Clone, Debug)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    /// L2 regularization applied to leaf values and gains
    pub lambda: f64,
    /// Shrinkage applied to stored leaf values (the learning rate)
    pub leaf_shrinkage: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            min_samples_leaf: 2,
            lambda: 1.0,
            leaf_shrinkage: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
    tie_breaker: SplitTieBreaker,
}

impl SplitCandidate {
    fn new(feature_idx: usize, threshold: f64, gain: f64, node_id: usize) -> Self {
        Self {
            feature_idx,
            threshold,
            gain,
            tie_breaker: SplitTieBreaker::new(feature_idx, threshold, node_id),
        }
    }
}

/// Build one regression tree on a (possibly subsampled) set of rows and
/// feature columns.
pub struct CartBuilder<'a> {
    config: TreeConfig,
    features: &'a [FeatureVector],
    gradients: &'a [f64],
    hessians: &'a [f64],
    /// Feature columns this tree may split on (column subsample)
    active_features: &'a [usize],
}

impl<'a> CartBuilder<'a> {
    pub fn new(
        features: &'a [FeatureVector],
        gradients: &'a [f64],
        hessians: &'a [f64],
        active_features: &'a [usize],
        config: TreeConfig,
    ) -> Self {
        assert_eq!(features.len(), gradients.len());
        assert_eq!(features.len(), hessians.len());

        Self {
            config,
            features,
            gradients,
            hessians,
            active_features,
        }
    }

    /// Build the tree for the given row indices.
    pub fn build(&self, rows: &[usize]) -> Tree {
        let mut nodes = Vec::new();
        self.build_node(rows, 0, &mut nodes, 0);
        Tree { nodes }
    }

    fn build_node(&self, rows: &[usize], depth: usize, nodes: &mut Vec<Node>, node_id: usize) -> u16 {
        let current_idx = nodes.len() as u16;
        let leaf_value = self.leaf_value(rows);

        let make_leaf = |nodes: &mut Vec<Node>| {
            nodes.push(Node {
                feature_index: 0,
                threshold: 0.0,
                left: 0,
                right: 0,
                value: Some(leaf_value),
            });
        };

        if depth >= self.config.max_depth || rows.len() < 2 * self.config.min_samples_leaf {
            make_leaf(nodes);
            return current_idx;
        }

        let split = match self.find_best_split(rows, node_id) {
            Some(s) if s.gain > 0.0 => s,
            _ => {
                make_leaf(nodes);
                return current_idx;
            }
        };

        let (left_rows, right_rows) = self.partition(rows, split.feature_idx, split.threshold);

        if left_rows.len() < self.config.min_samples_leaf
            || right_rows.len() < self.config.min_samples_leaf
        {
            make_leaf(nodes);
            return current_idx;
        }

        nodes.push(Node {
            feature_index: split.feature_idx as u16,
            threshold: split.threshold,
            left: 0,
            right: 0,
            value: None,
        });

        let left_idx = self.build_node(&left_rows, depth + 1, nodes, node_id * 2 + 1);
        let right_idx = self.build_node(&right_rows, depth + 1, nodes, node_id * 2 + 2);

        nodes[current_idx as usize].left = left_idx;
        nodes[current_idx as usize].right = right_idx;

        current_idx
    }

    fn find_best_split(&self, rows: &[usize], node_id: usize) -> Option<SplitCandidate> {
        let mut best: Option<SplitCandidate> = None;

        for &feature_idx in self.active_features {
            for threshold in self.candidate_thresholds(rows, feature_idx) {
                let (left, right) = self.partition(rows, feature_idx, threshold);

                if left.len() < self.config.min_samples_leaf
                    || right.len() < self.config.min_samples_leaf
                {
                    continue;
                }

                let gain = self.split_gain(&left, &right, rows);
                let candidate = SplitCandidate::new(feature_idx, threshold, gain, node_id);

                best = match best {
                    None => Some(candidate),
                    Some(current) => {
                        if gain > current.gain
                            || (gain == current.gain && candidate.tie_breaker < current.tie_breaker)
                        {
                            Some(candidate)
                        } else {
                            Some(current)
                        }
                    }
                };
            }
        }

        best
    }

    /// Midpoints between consecutive distinct values of a feature.
    fn candidate_thresholds(&self, rows: &[usize], feature_idx: usize) -> Vec<f64> {
        let mut values: Vec<f64> = rows
            .iter()
            .map(|&r| self.features[r][feature_idx])
            .collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        values.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    fn partition(&self, rows: &[usize], feature_idx: usize, threshold: f64) -> (Vec<usize>, Vec<usize>) {
        let mut left = Vec::new();
        let mut right = Vec::new();

        for &r in rows {
            if self.features[r][feature_idx] <= threshold {
                left.push(r);
            } else {
                right.push(r);
            }
        }

        (left, right)
    }

    /// Gain = G_l^2/(H_l+l) + G_r^2/(H_r+l) - G_p^2/(H_p+l)
    fn split_gain(&self, left: &[usize], right: &[usize], parent: &[usize]) -> f64 {
        let score = |rows: &[usize]| {
            let (g, h) = self.sum_grad_hess(rows);
            (g * g) / (h + self.config.lambda)
        };

        score(left) + score(right) - score(parent)
    }

    fn sum_grad_hess(&self, rows: &[usize]) -> (f64, f64) {
        let mut g = 0.0;
        let mut h = 0.0;
        for &r in rows {
            g += self.gradients[r];
            h += self.hessians[r];
        }
        (g, h)
    }

    /// Optimal shrunk leaf value: -lr * G / (H + lambda)
    fn leaf_value(&self, rows: &[usize]) -> f64 {
        let (g, h) = self.sum_grad_hess(rows);
        let denom = h + self.config.lambda;
        if denom <= 0.0 {
            return 0.0;
        }
        -self.config.leaf_shrinkage * g / denom
    }
}
