//! Decision engine: model inference, rule gating, and recommendation
//! assembly for a single sample.

use crate::artifact::TrainedArtifact;
use crate::errors::Result;
use crate::recommend;
use crate::rules;
use crate::schema::Sample;
use crate::verdict::{Status, Verdict};

/// Classify one sample against a trained artifact.
///
/// The rule-override gate wins over the model: if any guideline check
/// fires the verdict is Unsafe no matter the probability. Any failure
/// aborts before a partial verdict is produced.
pub fn decide(artifact: &TrainedArtifact, sample: &Sample) -> Result<Verdict> {
    sample.validate()?;
    artifact.verify_schema()?;

    let features = sample.feature_vector();
    let model_probability = artifact.model.predict_proba(&features);
    let model_says_unsafe = model_probability > artifact.threshold;

    let triggering_rules = rules::evaluate(sample);
    let status = if !triggering_rules.is_empty() || model_says_unsafe {
        Status::Unsafe
    } else {
        Status::Safe
    };

    tracing::debug!(
        probability = model_probability,
        threshold = artifact.threshold,
        rules_fired = triggering_rules.len(),
        %status,
        "sample classified"
    );

    let recommendations = recommend::generate(sample, status);

    Ok(Verdict {
        status,
        triggering_rules,
        model_probability,
        recommendations,
        input_data: *sample,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactMetadata;
    use crate::gbdt::{GbdtModel, Node, Tree};
    use crate::rules::RuleId;
    use crate::schema::FEATURE_COLUMNS;

    /// Artifact whose model always outputs the given margin.
    fn constant_artifact(margin: f64, threshold: f64) -> TrainedArtifact {
        TrainedArtifact {
            model: GbdtModel {
                trees: vec![Tree {
                    nodes: vec![Node {
                        feature_index: 0,
                        threshold: 0.0,
                        left: 0,
                        right: 0,
                        value: Some(margin),
                    }],
                }],
                base_score: 0.0,
            },
            threshold,
            feature_names: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            metadata: ArtifactMetadata {
                version: "0.1.0".to_string(),
                created_at: 1_700_000_000,
                training_rows: 0,
                test_rows: 0,
            },
        }
    }

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
    fn test_rule_override_beats_confident_safe_model() {
        // Strongly negative margin: model is sure the water is safe.
        let artifact = constant_artifact(-10.0, 0.5);
        let mut sample = nominal_sample();
        sample.e_coli = 1.0;

        let verdict = decide(&artifact, &sample).unwrap();
        assert_eq!(verdict.status, Status::Unsafe);
        assert!(verdict.triggering_rules.contains(&RuleId::EColi));
        assert!(verdict.model_probability < 0.01);
    }

    #[test]
    fn test_nominal_sample_follows_model() {
        let sample = nominal_sample();

        let safe = decide(&constant_artifact(-2.0, 0.5), &sample).unwrap();
        assert_eq!(safe.status, Status::Safe);
        assert!(safe.triggering_rules.is_empty());
        assert!(safe.recommendations.is_empty());

        let unsafe_verdict = decide(&constant_artifact(2.0, 0.5), &sample).unwrap();
        assert_eq!(unsafe_verdict.status, Status::Unsafe);
        assert!(unsafe_verdict.triggering_rules.is_empty());
        // Fallback recommendation guarantees Unsafe never has an empty list
        assert_eq!(unsafe_verdict.recommendations.len(), 1);
    }

    #[test]
    fn test_threshold_boundary_is_strict() {
        // Margin 0 gives probability exactly 0.5, which is not > 0.5.
        let verdict = decide(&constant_artifact(0.0, 0.5), &nominal_sample()).unwrap();
        assert_eq!(verdict.status, Status::Safe);
    }

    #[test]
    fn test_contaminated_scenario() {
        let artifact = constant_artifact(-1.0, 0.5);
        let mut sample = nominal_sample();
        sample.ph = 4.0;
        sample.turbidity = 5.0;
        sample.chlorine = 3.5;
        sample.total_coliforms = 432.0;
        sample.e_coli = 343.0;

        let verdict = decide(&artifact, &sample).unwrap();
        assert_eq!(verdict.status, Status::Unsafe);
        // turbidity == 5 and chlorine 3.5 stay under their gates
        assert_eq!(
            verdict.triggering_rules,
            vec![RuleId::PhRange, RuleId::TotalColiforms, RuleId::EColi]
        );

        let joined = verdict.recommendations.join("\n");
        assert!(joined.contains("below the safe range"));
        assert!(joined.contains("Total coliforms detected"));
        assert!(joined.contains("E. coli detected"));
    }

    #[test]
    fn test_decide_is_idempotent() {
        let artifact = constant_artifact(0.7, 0.3);
        let mut sample = nominal_sample();
        sample.turbidity = 6.2;

        let v1 = decide(&artifact, &sample).unwrap();
        let v2 = decide(&artifact, &sample).unwrap();
        assert_eq!(v1, v2);

        let json1 = serde_json::to_string(&v1).unwrap();
        let json2 = serde_json::to_string(&v2).unwrap();
        assert_eq!(json1, json2);
    }

    #[test]
    fn test_invalid_sample_aborts_without_verdict() {
        let artifact = constant_artifact(0.0, 0.5);
        let mut sample = nominal_sample();
        sample.salinity = f64::NAN;

        assert!(decide(&artifact, &sample).is_err());
    }
}
