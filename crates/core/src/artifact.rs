//! Trained artifact persistence and verification.
//!
//! The artifact is the contract between training and inference: a fitted
//! classifier, the calibrated decision threshold, and the feature column
//! order the model was fitted against. It is written as JSON with a blake3
//! hash in a companion `.hash` file, and verified on load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, Result};
use crate::gbdt::GbdtModel;
use crate::schema::FEATURE_COLUMNS;

/// Provenance metadata recorded at training time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactMetadata {
    /// Trainer version string
    pub version: String,
    /// Unix timestamp (UTC seconds) of training completion
    pub created_at: u64,
    /// Rows in the balanced training set
    pub training_rows: usize,
    /// Rows in the held-out test set used for calibration
    pub test_rows: usize,
}

/// Immutable bundle of fitted classifier and calibrated threshold.
///
/// The only legal way to create one is the training pipeline; inference
/// holds it read-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainedArtifact {
    /// Fitted GBDT classifier
    pub model: GbdtModel,
    /// Decision threshold in [0, 1]: predicted Unsafe iff probability > threshold
    pub threshold: f64,
    /// Feature columns the model expects, in order
    pub feature_names: Vec<String>,
    pub metadata: ArtifactMetadata,
}

fn hash_path(path: &Path) -> std::path::PathBuf {
    path.with_extension("hash")
}

impl TrainedArtifact {
    /// Check internal consistency: threshold range and feature column order.
    pub fn verify_schema(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(CoreError::ArtifactLoad(format!(
                "threshold {} outside [0, 1]",
                self.threshold
            )));
        }

        if self.feature_names.len() != FEATURE_COLUMNS.len() {
            return Err(CoreError::FeatureMismatch(format!(
                "artifact expects {} features, schema has {}",
                self.feature_names.len(),
                FEATURE_COLUMNS.len()
            )));
        }

        for (i, (have, want)) in self
            .feature_names
            .iter()
            .zip(FEATURE_COLUMNS.iter())
            .enumerate()
        {
            if have != want {
                return Err(CoreError::FeatureMismatch(format!(
                    "feature {i}: artifact has '{have}', schema expects '{want}'"
                )));
            }
        }

        // Structural check on every tree: the builder emits children after
        // their parent, so internal nodes must point strictly forward.
        // Anything else (cycles, dangling indices, bad feature index) is a
        // corrupt model file.
        for (t, tree) in self.model.trees.iter().enumerate() {
            for (i, node) in tree.nodes.iter().enumerate() {
                if node.value.is_some() {
                    continue;
                }

                let left = node.left as usize;
                let right = node.right as usize;
                if left <= i || right <= i || left >= tree.nodes.len() || right >= tree.nodes.len()
                {
                    return Err(CoreError::ArtifactLoad(format!(
                        "tree {t} node {i}: children ({left}, {right}) must point \
                         strictly forward within {} nodes",
                        tree.nodes.len()
                    )));
                }

                if node.feature_index as usize >= FEATURE_COLUMNS.len() {
                    return Err(CoreError::ArtifactLoad(format!(
                        "tree {t} node {i}: feature index {} out of range",
                        node.feature_index
                    )));
                }
            }
        }

        Ok(())
    }

    /// Write the artifact as JSON plus a blake3 hash companion file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, &json)?;

        let hash = blake3::hash(json.as_bytes());
        std::fs::write(hash_path(path), hex::encode(hash.as_bytes()))?;

        tracing::info!("saved artifact to {}", path.display());
        Ok(())
    }

    /// Load and verify an artifact.
    ///
    /// The hash companion is checked when present; a missing companion is
    /// tolerated, a mismatching one is not.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ArtifactLoad(format!("cannot read {}: {e}", path.display()))
        })?;

        let hash_file = hash_path(path);
        if hash_file.exists() {
            let expected = std::fs::read_to_string(&hash_file).map_err(|e| {
                CoreError::ArtifactLoad(format!("cannot read {}: {e}", hash_file.display()))
            })?;
            let actual = hex::encode(blake3::hash(json.as_bytes()).as_bytes());
            if expected.trim() != actual {
                return Err(CoreError::ArtifactLoad(format!(
                    "hash mismatch for {}: expected {}, computed {}",
                    path.display(),
                    expected.trim(),
                    actual
                )));
            }
        }

        let artifact: TrainedArtifact = serde_json::from_str(&json)
            .map_err(|e| CoreError::ArtifactLoad(format!("corrupt artifact: {e}")))?;

        artifact.verify_schema()?;
        tracing::debug!(
            trees = artifact.model.trees.len(),
            threshold = artifact.threshold,
            "loaded artifact from {}",
            path.display()
        );

        Ok(artifact)
    }
}
