//! Comprehensive tests for domain_fraud

use std::sync::Arc;

use proptest::prelude::*;

use domain_claims::ClaimRecord;
use domain_fraud::{
    reconcile, EncodedFeatureVector, Explainer, FeatureEncoder, FeatureSchema, FraudAssessment,
    FraudError, FraudModel, FraudScorer, ThresholdConfig, DEFAULT_TOP_FEATURES,
};
use test_utils::{
    assert_assessment_consistent, assert_attributions_additive, assert_vector_matches_schema,
    claim_record_strategy, ArtifactFixtures, ClaimFixtures, LOW_RISK_CLAIM_ID, MODEL_JSON,
    SCHEMA_JSON,
};

const LOGISTIC_JSON: &str = r#"{
    "kind": "logistic",
    "intercept": -2.1,
    "feature_names": ["insured_age", "prior_claims_count", "incident_type_Theft"],
    "coefficients": [-0.015, 0.62, 1.4],
    "feature_means": [44.0, 1.2, 0.18]
}"#;

fn schema() -> Arc<FeatureSchema> {
    ArtifactFixtures::schema()
}

fn model() -> Arc<FraudModel> {
    ArtifactFixtures::model()
}

fn encoder() -> FeatureEncoder {
    ArtifactFixtures::encoder()
}

/// Friday, Sedan collision reported by the insured, one prior claim
fn low_risk_claim() -> ClaimRecord {
    ClaimFixtures::low_risk()
}

/// Saturday motorcycle theft reported by the claimant, four prior claims
fn high_risk_claim() -> ClaimRecord {
    ClaimFixtures::high_risk()
}

// ============================================================================
// Encoder Tests
// ============================================================================

mod encoder_tests {
    use super::*;

    #[test]
    fn test_encodes_to_schema_columns() {
        let vector = encoder().encode(&low_risk_claim()).unwrap();
        assert_vector_matches_schema(&vector, &schema());

        assert_eq!(vector.get("insured_age"), Some(42.0));
        assert_eq!(vector.get("policy_limit"), Some(50000.0));
        assert_eq!(vector.get("incident_month"), Some(3.0));
        assert_eq!(vector.get("incident_dayofweek"), Some(4.0));
        assert_eq!(vector.get("state_CA"), Some(1.0));
        assert_eq!(vector.get("state_TX"), Some(0.0));
        assert_eq!(vector.get("reported_by_Insured"), Some(1.0));
    }

    #[test]
    fn test_dropped_columns_never_appear() {
        let vector = encoder().encode(&low_risk_claim()).unwrap();
        for dropped in domain_fraud::encoder::DROPPED_COLUMNS {
            assert!(vector.get(dropped).is_none(), "{} leaked into the vector", dropped);
        }
    }

    #[test]
    fn test_sunday_is_day_six() {
        let mut claim = low_risk_claim();
        claim.incident_date = "2024-03-17 08:30:00".to_string();
        let vector = encoder().encode(&claim).unwrap();
        assert_eq!(vector.get("incident_dayofweek"), Some(6.0));
    }

    #[test]
    fn test_unparseable_incident_date_is_malformed() {
        let mut claim = low_risk_claim();
        claim.incident_date = "15th of March".to_string();
        let err = encoder().encode(&claim).unwrap_err();
        assert!(matches!(err, FraudError::MalformedRecord { ref claim_id, .. } if claim_id == LOW_RISK_CLAIM_ID));
    }

    #[test]
    fn test_missing_categorical_is_malformed() {
        let mut claim = low_risk_claim();
        claim.reported_by = Some("   ".to_string());
        let err = encoder().encode(&claim).unwrap_err();
        assert!(matches!(err, FraudError::MalformedRecord { ref reason, .. } if reason.contains("reported_by")));

        let mut claim = low_risk_claim();
        claim.state = None;
        assert!(encoder().encode(&claim).is_err());
    }

    #[test]
    fn test_unseen_state_zeroes_every_state_indicator() {
        let mut claim = low_risk_claim();
        claim.state = Some("WA".to_string());
        let vector = encoder().encode(&claim).unwrap();
        let states: Vec<f64> = vector
            .iter()
            .filter(|(c, _)| c.starts_with("state_"))
            .map(|(_, v)| v)
            .collect();
        assert_eq!(states, vec![0.0; 4]);
    }

    #[test]
    fn test_reconcile_is_schema_driven() {
        let schema = FeatureSchema::from_columns(vec!["b".into(), "a".into(), "z".into()]).unwrap();
        let expanded = vec![("a".to_string(), 1.5), ("b".to_string(), 2.5), ("extra".to_string(), 9.0)];
        let vector = reconcile(&expanded, &schema);
        assert_eq!(vector.values(), &[2.5, 1.5, 0.0]);
    }

    #[test]
    fn test_schema_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feature_schema.json");
        std::fs::write(&path, SCHEMA_JSON).unwrap();

        let encoder = FeatureEncoder::load(&path).unwrap();
        assert_eq!(encoder.schema().len(), 23);
    }

    #[test]
    fn test_missing_schema_is_unavailable() {
        let err = FeatureEncoder::load("/nonexistent/schema.json").unwrap_err();
        assert!(matches!(err, FraudError::SchemaUnavailable(_)));
    }
}

// ============================================================================
// Scorer Tests
// ============================================================================

mod scorer_tests {
    use super::*;

    fn scorer() -> FraudScorer {
        FraudScorer::new(model(), ThresholdConfig::default())
    }

    #[test]
    fn test_model_matches_schema() {
        model().ensure_schema(&schema()).unwrap();
    }

    #[test]
    fn test_low_risk_claim_is_not_flagged() {
        let vector = encoder().encode(&low_risk_claim()).unwrap();
        let assessment = scorer().score(&vector).unwrap();

        // logit(0.2) - 0.31 + 0.05 - 0.12
        let margin = (0.2f64 / 0.8).ln() - 0.38;
        let expected = 1.0 / (1.0 + (-margin).exp());
        assert!((assessment.probability - expected).abs() < 1e-12);
        assert_eq!(assessment.label, 0);
        assert!(!assessment.is_flagged());
        assert!((assessment.confidence - (1.0 - expected)).abs() < 1e-12);
    }

    #[test]
    fn test_high_risk_claim_is_flagged() {
        let vector = encoder().encode(&high_risk_claim()).unwrap();
        let assessment = scorer().score(&vector).unwrap();

        assert!(assessment.probability > 0.5);
        assert_eq!(assessment.label, 1);
        assert_assessment_consistent(&assessment);
        assert_eq!(assessment.confidence, assessment.probability);
        assert_eq!(assessment.threshold, 0.30);
    }

    #[test]
    fn test_configured_threshold_changes_label() {
        let vector = encoder().encode(&low_risk_claim()).unwrap();
        let strict = FraudScorer::new(model(), ThresholdConfig::new(0.1).unwrap());
        assert_eq!(strict.score(&vector).unwrap().label, 1);
    }

    #[test]
    fn test_foreign_vector_is_shape_mismatch() {
        let columns: Arc<[String]> = vec!["insured_age".to_string()].into();
        let vector = EncodedFeatureVector::new(columns, vec![30.0]).unwrap();
        let err = scorer().score(&vector).unwrap_err();
        assert!(matches!(err, FraudError::ShapeMismatch(_)));
    }

    #[test]
    fn test_model_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fraud_model.json");
        std::fs::write(&path, MODEL_JSON).unwrap();

        let model = FraudModel::load(&path).unwrap();
        assert_eq!(model.kind(), "gradient_boosted_trees");
    }
}

// ============================================================================
// Explanation Tests
// ============================================================================

mod explain_tests {
    use super::*;

    #[test]
    fn test_tree_attributions_add_up() {
        let vector = encoder().encode(&high_risk_claim()).unwrap();
        let set = Explainer::new(model()).explain(&vector).unwrap();

        assert_eq!(set.attributions().len(), schema().len());
        assert_attributions_additive(&set);
        let raw = model().margin(&vector).unwrap();
        assert!((set.raw_output() - raw).abs() < 1e-12);
    }

    #[test]
    fn test_unused_features_get_zero() {
        let vector = encoder().encode(&low_risk_claim()).unwrap();
        let set = Explainer::new(model()).explain(&vector).unwrap();
        let state_ca = set
            .attributions()
            .iter()
            .find(|a| a.feature == "state_CA")
            .unwrap();
        assert_eq!(state_ca.attribution, 0.0);
        assert_eq!(state_ca.value, 1.0);
    }

    #[test]
    fn test_top_features_lead_with_prior_claims_for_high_risk() {
        let vector = encoder().encode(&high_risk_claim()).unwrap();
        let set = Explainer::new(model()).explain(&vector).unwrap();

        let top = set.top(DEFAULT_TOP_FEATURES);
        assert_eq!(top.len(), DEFAULT_TOP_FEATURES);
        assert_eq!(top[0].feature, "prior_claims_count");
        assert!(top.windows(2).all(|w| w[0].attribution.abs() >= w[1].attribution.abs()));
    }

    #[test]
    fn test_logistic_attributions_add_up() {
        let model = Arc::new(FraudModel::from_json_str(LOGISTIC_JSON).unwrap());
        let columns: Arc<[String]> = model.feature_names().to_vec().into();
        let vector = EncodedFeatureVector::new(columns, vec![31.0, 3.0, 1.0]).unwrap();

        let set = Explainer::new(model.clone()).explain(&vector).unwrap();
        assert_attributions_additive(&set);
        assert!((set.attributions()[1].attribution - 0.62 * 1.8).abs() < 1e-12);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn prop_encoded_columns_equal_schema(claim in claim_record_strategy()) {
        let schema = schema();
        let vector = FeatureEncoder::new(schema.clone()).encode(&claim).unwrap();
        prop_assert_eq!(vector.columns(), schema.columns());
        prop_assert_eq!(vector.len(), schema.len());

        let indicators: f64 = vector
            .iter()
            .filter(|(c, _)| c.contains('_') && !domain_fraud::encoder::NUMERIC_COLUMNS.contains(c))
            .map(|(_, v)| v)
            .sum();
        prop_assert!(indicators <= 4.0);
    }

    #[test]
    fn prop_encoding_is_idempotent(claim in claim_record_strategy()) {
        let encoder = encoder();
        prop_assert_eq!(encoder.encode(&claim).unwrap(), encoder.encode(&claim).unwrap());
    }

    #[test]
    fn prop_unseen_vehicle_has_no_vehicle_indicator(claim in claim_record_strategy(), suffix in "[0-9]{3}") {
        let mut claim = claim;
        claim.vehicle_type = Some(format!("Hovercraft{}", suffix));
        let vector = encoder().encode(&claim).unwrap();
        prop_assert!(vector
            .iter()
            .filter(|(c, _)| c.starts_with("vehicle_type_"))
            .all(|(_, v)| v == 0.0));
    }

    #[test]
    fn prop_label_iff_at_or_above_threshold(p in 0.0f64..=1.0, t in 0.01f64..=1.0) {
        let config = ThresholdConfig::new(t).unwrap();
        let assessment = FraudAssessment::new(p, config);
        prop_assert_eq!(assessment.label == 1, p >= t);
        prop_assert!(assessment.confidence >= 0.0 && assessment.confidence <= 1.0);
    }

    #[test]
    fn prop_tree_attributions_sum_to_raw_output(claim in claim_record_strategy()) {
        let vector = encoder().encode(&claim).unwrap();
        let set = Explainer::new(model()).explain(&vector).unwrap();
        prop_assert!(set.is_additive());
    }

    #[test]
    fn prop_logistic_attributions_sum_to_raw_output(
        age in 16.0f64..95.0,
        prior in 0.0f64..12.0,
        theft in prop_oneof![Just(0.0), Just(1.0)],
    ) {
        let model = Arc::new(FraudModel::from_json_str(LOGISTIC_JSON).unwrap());
        let columns: Arc<[String]> = model.feature_names().to_vec().into();
        let vector = EncodedFeatureVector::new(columns, vec![age, prior, theft]).unwrap();
        let set = Explainer::new(model.clone()).explain(&vector).unwrap();
        prop_assert!(set.is_additive());
        prop_assert!((set.raw_output() - model.margin(&vector).unwrap()).abs() < 1e-12);
    }
}
