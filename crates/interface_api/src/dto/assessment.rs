//! Fraud assessment DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_fraud::{AttributionSet, FeatureAttribution, FraudAssessment};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct AssessmentQuery {
    /// Number of features to include in the explanation
    #[validate(range(min = 1, max = 50))]
    pub top: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub claim_id: String,
    /// 1 when flagged as suspected fraud
    pub label: u8,
    pub flagged: bool,
    pub probability: f64,
    pub threshold: f64,
    pub confidence: f64,
    pub explanation: ExplanationResponse,
}

#[derive(Debug, Serialize)]
pub struct ExplanationResponse {
    /// Expected log-odds before any feature is seen
    pub baseline: f64,
    /// Log-odds for this claim
    pub raw_output: f64,
    /// Largest contributions by magnitude
    pub top_features: Vec<FeatureAttribution>,
}

impl AssessmentResponse {
    pub fn new(
        claim_id: &str,
        assessment: FraudAssessment,
        explanation: &AttributionSet,
        top: usize,
    ) -> Self {
        Self {
            claim_id: claim_id.to_string(),
            label: assessment.label,
            flagged: assessment.is_flagged(),
            probability: assessment.probability,
            threshold: assessment.threshold,
            confidence: assessment.confidence,
            explanation: ExplanationResponse {
                baseline: explanation.baseline(),
                raw_output: explanation.raw_output(),
                top_features: explanation.top(top).into_iter().cloned().collect(),
            },
        }
    }
}
