//! Claims DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_claims::ClaimRecord;

#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    /// Fragment of the claim id
    pub q: String,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub claim_ids: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLiabilityRequest {
    #[validate(range(min = 0, max = 100))]
    pub insured_liability: i32,
    #[validate(range(min = 0, max = 100))]
    pub claimant_liability: i32,
}

#[derive(Debug, Serialize)]
pub struct LiabilityResponse {
    pub claim_id: String,
    pub insured_liability: i32,
    pub claimant_liability: i32,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub claim_id: String,
    pub policy_start: String,
    pub incident_date: String,
    pub state: Option<String>,
    pub vehicle_type: Option<String>,
    pub incident_type: Option<String>,
    pub reported_by: Option<String>,
    pub insured_age: i32,
    pub prior_claims_count: i32,
    pub claim_amount: Decimal,
    pub policy_limit: Decimal,
    pub exceeds_policy_limit: bool,
    pub severity_score: f64,
    pub fact_of_loss: Option<String>,
    pub fraud_flag: Option<i32>,
    pub insured_liability: i32,
    pub claimant_liability: i32,
}

impl From<ClaimRecord> for ClaimResponse {
    fn from(claim: ClaimRecord) -> Self {
        let exceeds_policy_limit = claim.exceeds_policy_limit();
        Self {
            claim_id: claim.claim_id.as_str().to_string(),
            policy_start: claim.policy_start,
            incident_date: claim.incident_date,
            state: claim.state,
            vehicle_type: claim.vehicle_type,
            incident_type: claim.incident_type,
            reported_by: claim.reported_by,
            insured_age: claim.insured_age,
            prior_claims_count: claim.prior_claims_count,
            claim_amount: claim.claim_amount,
            policy_limit: claim.policy_limit,
            exceeds_policy_limit,
            severity_score: claim.severity_score,
            fact_of_loss: claim.fact_of_loss,
            fraud_flag: claim.fraud_flag,
            insured_liability: claim.insured_liability,
            claimant_liability: claim.claimant_liability,
        }
    }
}
