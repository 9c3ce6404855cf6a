//! Pre-built Test Fixtures
//!
//! Provides ready-to-use claims and the bundled fraud artifacts. The two
//! sample claims sit on either side of the default flagging threshold under
//! the bundled model.

use std::sync::Arc;

use core_kernel::ClaimId;
use domain_claims::ClaimRecord;
use domain_fraud::{FeatureEncoder, FeatureSchema, FraudModel};
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

/// Feature schema shipped in `artifacts/`
pub const SCHEMA_JSON: &str = include_str!("../../../artifacts/feature_schema.json");

/// Fraud model shipped in `artifacts/`
pub const MODEL_JSON: &str = include_str!("../../../artifacts/fraud_model.json");

static SCHEMA: Lazy<Arc<FeatureSchema>> =
    Lazy::new(|| Arc::new(FeatureSchema::from_json_str(SCHEMA_JSON).unwrap()));

static MODEL: Lazy<Arc<FraudModel>> =
    Lazy::new(|| Arc::new(FraudModel::from_json_str(MODEL_JSON).unwrap()));

/// Identifier of the low-risk sample claim
pub const LOW_RISK_CLAIM_ID: &str = "XAJI0Y6DP";

/// Identifier of the high-risk sample claim
pub const HIGH_RISK_CLAIM_ID: &str = "BQXA77K2M";

/// Identifier that no fixture uses
pub const UNKNOWN_CLAIM_ID: &str = "ZZZZ000000";

/// Fixture for claim records
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// Long-tenured insured, one prior claim, collision reported by the insured
    pub fn low_risk() -> ClaimRecord {
        ClaimRecord {
            claim_id: IdFixtures::low_risk(),
            policy_start: "2019-04-01".to_string(),
            incident_date: "2024-03-15".to_string(),
            state: Some("CA".to_string()),
            vehicle_type: Some("Sedan".to_string()),
            incident_type: Some("Collision".to_string()),
            reported_by: Some("Insured".to_string()),
            insured_age: 42,
            prior_claims_count: 1,
            claim_amount: dec!(8200.00),
            policy_limit: dec!(50000.00),
            severity_score: 0.35,
            fact_of_loss: Some("Rear-ended while stopped at a red light".to_string()),
            fraud_flag: Some(0),
            insured_liability: 50,
            claimant_liability: 50,
        }
    }

    /// Young insured, four prior claims, weekend motorcycle theft
    pub fn high_risk() -> ClaimRecord {
        ClaimRecord {
            claim_id: IdFixtures::high_risk(),
            policy_start: "2024-05-20".to_string(),
            incident_date: "2024-06-15".to_string(),
            state: Some("FL".to_string()),
            vehicle_type: Some("Motorcycle".to_string()),
            incident_type: Some("Theft".to_string()),
            reported_by: Some("Claimant".to_string()),
            insured_age: 22,
            prior_claims_count: 4,
            claim_amount: dec!(98000.00),
            policy_limit: dec!(100000.00),
            severity_score: 0.91,
            fact_of_loss: Some("Vehicle missing from apartment lot overnight".to_string()),
            fraud_flag: Some(1),
            insured_liability: 50,
            claimant_liability: 50,
        }
    }

    /// Low-risk claim whose incident date cannot be parsed
    pub fn with_bad_date() -> ClaimRecord {
        ClaimRecord {
            claim_id: ClaimId::parse("BADDATE01").unwrap(),
            incident_date: "not a date".to_string(),
            ..Self::low_risk()
        }
    }

    /// Both sample claims
    pub fn all() -> Vec<ClaimRecord> {
        vec![Self::low_risk(), Self::high_risk()]
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn low_risk() -> ClaimId {
        ClaimId::parse(LOW_RISK_CLAIM_ID).unwrap()
    }

    pub fn high_risk() -> ClaimId {
        ClaimId::parse(HIGH_RISK_CLAIM_ID).unwrap()
    }

    pub fn unknown() -> ClaimId {
        ClaimId::parse(UNKNOWN_CLAIM_ID).unwrap()
    }
}

/// Fixture for the fraud artifacts
pub struct ArtifactFixtures;

impl ArtifactFixtures {
    pub fn schema() -> Arc<FeatureSchema> {
        SCHEMA.clone()
    }

    pub fn model() -> Arc<FraudModel> {
        MODEL.clone()
    }

    pub fn encoder() -> FeatureEncoder {
        FeatureEncoder::new(Self::schema())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_ids_are_distinct() {
        assert_ne!(IdFixtures::low_risk(), IdFixtures::high_risk());
        assert_ne!(IdFixtures::low_risk(), IdFixtures::unknown());
    }

    #[test]
    fn test_artifacts_agree_on_columns() {
        let schema = ArtifactFixtures::schema();
        let model = ArtifactFixtures::model();
        assert!(model.ensure_schema(&schema).is_ok());
    }

    #[test]
    fn test_bad_date_fixture_fails_to_parse() {
        assert!(ClaimFixtures::with_bad_date().incident_date().is_err());
    }
}
