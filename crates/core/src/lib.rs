//! WaterWise decision core.
//!
//! Classifies a water sample as Safe or Unsafe from twelve measured
//! parameters, combining a trained GBDT classifier with deterministic
//! safety-rule overrides.
//!
//! Modules:
//! - `schema`: canonical sample and feature-vector types
//! - `gbdt`: gradient-boosted tree model and probability evaluator
//! - `artifact`: persisted (model, threshold) bundle with integrity checks
//! - `rules`: guideline overrides that can force an Unsafe verdict
//! - `recommend`: remediation guidance for out-of-range parameters
//! - `decision`: orchestration of model, rules, and recommendations
//! - `verdict`: the structured inference output

pub mod artifact;
pub mod decision;
pub mod errors;
pub mod gbdt;
pub mod recommend;
pub mod rules;
pub mod schema;
pub mod verdict;

pub use artifact::{ArtifactMetadata, TrainedArtifact};
pub use decision::decide;
pub use errors::CoreError;
pub use gbdt::{GbdtModel, Node, Tree};
pub use rules::RuleId;
pub use schema::{FeatureVector, Label, Sample, FEATURE_COLUMNS, FEATURE_COUNT, MICROBIAL_COLUMNS};
pub use verdict::{Status, Verdict};

/// Crate version string for artifact metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
