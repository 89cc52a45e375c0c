//! Structured inference output.

use serde::{Deserialize, Serialize};

use crate::rules::RuleId;
use crate::schema::Sample;

/// Final safety classification of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Safe,
    Unsafe,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Safe => write!(f, "Safe"),
            Status::Unsafe => write!(f, "Unsafe"),
        }
    }
}

/// The structured result of one inference call.
///
/// `status` is Unsafe whenever any rule override fired, regardless of the
/// model probability. Produced once per call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: Status,
    /// Guideline checks that forced the verdict, in check order
    pub triggering_rules: Vec<RuleId>,
    /// Calibrated model probability of the Unsafe class
    pub model_probability: f64,
    /// Remediation guidance, in fixed check order
    pub recommendations: Vec<String>,
    /// Echo of the classified sample
    pub input_data: Sample,
}
