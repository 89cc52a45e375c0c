//! Deterministic safety-guideline overrides.
//!
//! These checks can force an Unsafe verdict regardless of what the model
//! says. Thresholds follow drinking-water guidelines; the chlorine gate at
//! 5 mg/L is intentionally stricter-valued than the 4 mg/L advisory in the
//! recommendation generator, as the two serve different policies.

use serde::{Deserialize, Serialize};

use crate::schema::Sample;

/// Stable identifier for a guideline check, reported for explainability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    PhRange,
    Turbidity,
    Chlorine,
    TotalColiforms,
    EColi,
}

impl RuleId {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::PhRange => "ph_range",
            RuleId::Turbidity => "turbidity",
            RuleId::Chlorine => "chlorine",
            RuleId::TotalColiforms => "total_coliforms",
            RuleId::EColi => "e_coli",
        }
    }
}

/// Evaluate every guideline check against a sample.
///
/// Pure function: returns the identifiers of the rules that fired, in the
/// fixed check order. The gate forces Unsafe iff the list is non-empty.
pub fn evaluate(sample: &Sample) -> Vec<RuleId> {
    let checks = [
        (RuleId::PhRange, sample.ph < 6.5 || sample.ph > 8.5),
        (RuleId::Turbidity, sample.turbidity > 5.0),
        (RuleId::Chlorine, sample.chlorine > 5.0),
        (RuleId::TotalColiforms, sample.total_coliforms > 0.0),
        (RuleId::EColi, sample.e_coli > 0.0),
    ];

    checks
        .into_iter()
        .filter_map(|(id, fired)| fired.then_some(id))
        .collect()
}
