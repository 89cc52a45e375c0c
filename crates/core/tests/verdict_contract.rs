//! Contract tests for the structured verdict output.

use waterwise_core::{
    decide, ArtifactMetadata, GbdtModel, Node, Sample, Status, TrainedArtifact, Tree,
    FEATURE_COLUMNS,
};

fn stump_artifact(margin: f64, threshold: f64) -> TrainedArtifact {
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
            training_rows: 160,
            test_rows: 40,
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
fn verdict_json_carries_the_contract_keys() {
    let verdict = decide(&stump_artifact(-2.0, 0.5), &nominal_sample()).unwrap();
    let json = serde_json::to_value(&verdict).unwrap();

    assert_eq!(json["status"], "Safe");
    assert!(json["recommendations"].as_array().unwrap().is_empty());
    assert_eq!(json["input_data"]["pH"], 7.2);
    assert_eq!(json["input_data"]["total_coliforms"], 0.0);
    assert!(json["model_probability"].as_f64().unwrap() < 0.5);
    assert!(json["triggering_rules"].as_array().unwrap().is_empty());
}

#[test]
fn rule_ids_serialize_as_snake_case_identifiers() {
    let mut sample = nominal_sample();
    sample.ph = 4.0;
    sample.e_coli = 343.0;

    let verdict = decide(&stump_artifact(-2.0, 0.5), &sample).unwrap();
    let json = serde_json::to_value(&verdict).unwrap();

    let rules: Vec<&str> = json["triggering_rules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(rules, vec!["ph_range", "e_coli"]);
    assert_eq!(json["status"], "Unsafe");
}

#[test]
fn microbial_contamination_always_means_unsafe() {
    // Even a model certain the water is safe cannot override detection.
    let artifact = stump_artifact(-20.0, 0.9);

    for (tc, ec) in [(1.0, 0.0), (0.0, 1.0), (432.0, 343.0)] {
        let mut sample = nominal_sample();
        sample.total_coliforms = tc;
        sample.e_coli = ec;

        let verdict = decide(&artifact, &sample).unwrap();
        assert_eq!(verdict.status, Status::Unsafe);
        assert!(!verdict.recommendations.is_empty());
    }
}

#[test]
fn clean_sample_is_decided_by_the_model_alone() {
    let sample = nominal_sample();

    let lenient = decide(&stump_artifact(1.0, 0.9), &sample).unwrap();
    assert_eq!(lenient.status, Status::Safe);
    assert!(lenient.triggering_rules.is_empty());

    let strict = decide(&stump_artifact(1.0, 0.5), &sample).unwrap();
    assert_eq!(strict.status, Status::Unsafe);
    assert!(strict.triggering_rules.is_empty());
}

#[test]
fn repeated_calls_yield_byte_identical_json() {
    let artifact = stump_artifact(0.4, 0.3);
    let mut sample = nominal_sample();
    sample.hardness = 777.0;

    let a = serde_json::to_string(&decide(&artifact, &sample).unwrap()).unwrap();
    let b = serde_json::to_string(&decide(&artifact, &sample).unwrap()).unwrap();
    assert_eq!(a, b);
}
