//! Canonical water sample schema shared by training and inference.
//!
//! The column order here is the contract between the trainer and the
//! decision engine: a persisted artifact records the feature names it was
//! fitted against, and inference refuses to run if they disagree.

use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, Result};

/// Number of model input features (physicochemical fields only).
pub const FEATURE_COUNT: usize = 10;

/// Model feature columns, in the fixed order used for training and inference.
///
/// The two microbial fields are deliberately excluded: they define the label
/// and would leak the target into the features.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "ph",
    "turbidity",
    "temperature",
    "conductivity",
    "dissolved_oxygen",
    "salinity",
    "total_dissolved_solids",
    "hardness",
    "alkalinity",
    "chlorine",
];

/// Label-determining microbial columns.
pub const MICROBIAL_COLUMNS: [&str; 2] = ["total_coliforms", "e_coli"];

/// Ordered model input vector, projected from a [`Sample`].
pub type FeatureVector = [f64; FEATURE_COUNT];

/// One water-quality measurement record.
///
/// All fields are required and must be finite; a missing or non-finite
/// value is a validation error, never a default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "pH")]
    pub ph: f64,
    pub turbidity: f64,
    pub temperature: f64,
    pub conductivity: f64,
    pub dissolved_oxygen: f64,
    pub salinity: f64,
    pub total_dissolved_solids: f64,
    pub hardness: f64,
    pub alkalinity: f64,
    pub chlorine: f64,
    pub total_coliforms: f64,
    pub e_coli: f64,
}

impl Sample {
    /// Validate that every field is a finite number.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("pH", self.ph),
            ("turbidity", self.turbidity),
            ("temperature", self.temperature),
            ("conductivity", self.conductivity),
            ("dissolved_oxygen", self.dissolved_oxygen),
            ("salinity", self.salinity),
            ("total_dissolved_solids", self.total_dissolved_solids),
            ("hardness", self.hardness),
            ("alkalinity", self.alkalinity),
            ("chlorine", self.chlorine),
            ("total_coliforms", self.total_coliforms),
            ("e_coli", self.e_coli),
        ];

        for (name, value) in fields {
            if !value.is_finite() {
                return Err(CoreError::Input(format!(
                    "field '{name}' is not a finite number: {value}"
                )));
            }
        }

        Ok(())
    }

    /// Project the sample onto the 10 model features, in canonical order.
    pub fn feature_vector(&self) -> FeatureVector {
        [
            self.ph,
            self.turbidity,
            self.temperature,
            self.conductivity,
            self.dissolved_oxygen,
            self.salinity,
            self.total_dissolved_solids,
            self.hardness,
            self.alkalinity,
            self.chlorine,
        ]
    }
}

/// Binary safety label. `Unsafe = 1` is the positive class everywhere:
/// the model output is the probability of `Unsafe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Safe,
    Unsafe,
}

impl Label {
    /// Derive the ground-truth label from the microbial fields.
    ///
    /// A pure function, never learned: any detected coliforms or E. coli
    /// make the sample unsafe.
    pub fn derive(total_coliforms: f64, e_coli: f64) -> Self {
        if total_coliforms > 0.0 || e_coli > 0.0 {
            Label::Unsafe
        } else {
            Label::Safe
        }
    }

    /// Class index used by the trainer (Safe = 0, Unsafe = 1).
    pub fn class_index(self) -> u8 {
        match self {
            Label::Safe => 0,
            Label::Unsafe => 1,
        }
    }

}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Safe => write!(f, "Safe"),
            Label::Unsafe => write!(f, "Unsafe"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal_sample() -> Sample {
        Sample {
            ph: 7.2,
            turbidity: 1.0,
            temperature: 22.0,
            conductivity: 400.0,
            dissolved_oxygen: 8.0,
            salinity: 0.2,
            total_dissolved_solids: 250.0,
            hardness: 120.0,
            alkalinity: 100.0,
            chlorine: 1.0,
            total_coliforms: 0.0,
            e_coli: 0.0,
        }
    }

    #[test]
    fn test_feature_vector_order_matches_columns() {
        let sample = Sample {
            ph: 0.0,
            turbidity: 1.0,
            temperature: 2.0,
            conductivity: 3.0,
            dissolved_oxygen: 4.0,
            salinity: 5.0,
            total_dissolved_solids: 6.0,
            hardness: 7.0,
            alkalinity: 8.0,
            chlorine: 9.0,
            total_coliforms: 0.0,
            e_coli: 0.0,
        };

        let fv = sample.feature_vector();
        for (i, &v) in fv.iter().enumerate() {
            assert_eq!(v, i as f64, "feature {} out of order", FEATURE_COLUMNS[i]);
        }
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut sample = nominal_sample();
        sample.turbidity = f64::NAN;
        assert!(sample.validate().is_err());

        let mut sample = nominal_sample();
        sample.chlorine = f64::INFINITY;
        assert!(sample.validate().is_err());

        assert!(nominal_sample().validate().is_ok());
    }

    #[test]
    fn test_label_derivation() {
        assert_eq!(Label::derive(0.0, 0.0), Label::Safe);
        assert_eq!(Label::derive(1.0, 0.0), Label::Unsafe);
        assert_eq!(Label::derive(0.0, 0.5), Label::Unsafe);
        assert_eq!(Label::derive(432.0, 343.0), Label::Unsafe);
    }

    #[test]
    fn test_sample_serializes_ph_key() {
        let json = serde_json::to_value(nominal_sample()).unwrap();
        assert!(json.get("pH").is_some());
        assert!(json.get("e_coli").is_some());
    }
}
