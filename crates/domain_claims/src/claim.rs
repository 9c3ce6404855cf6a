//! Claim record under review

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{parse_claim_date, ClaimId};
use crate::error::ClaimError;
use crate::liability::LiabilitySplit;

/// One row of claim attributes as stored by the ingestion process
///
/// Dates are kept as the stored text and parsed on demand, so a record with a
/// malformed date can still be displayed. Categorical attributes are nullable
/// in storage; the fraud encoder rejects records where they are missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Unique, immutable identifier
    pub claim_id: ClaimId,
    /// Policy start date as stored
    pub policy_start: String,
    /// Incident date as stored
    pub incident_date: String,
    /// State of the incident
    pub state: Option<String>,
    /// Vehicle type
    pub vehicle_type: Option<String>,
    /// Incident type
    pub incident_type: Option<String>,
    /// Who reported the claim
    pub reported_by: Option<String>,
    /// Age of the insured
    pub insured_age: i32,
    /// Number of prior claims on the policy
    pub prior_claims_count: i32,
    /// Claimed amount
    pub claim_amount: Decimal,
    /// Policy limit
    pub policy_limit: Decimal,
    /// Severity score assigned at intake
    pub severity_score: f64,
    /// Free-text fact of loss
    pub fact_of_loss: Option<String>,
    /// Training label, when known
    pub fraud_flag: Option<i32>,
    /// Insured liability percentage
    pub insured_liability: i32,
    /// Claimant liability percentage
    pub claimant_liability: i32,
}

impl ClaimRecord {
    /// Parses the incident date
    pub fn incident_date(&self) -> Result<NaiveDate, ClaimError> {
        parse_claim_date(&self.incident_date).map_err(|source| ClaimError::InvalidDate {
            field: "incident_date",
            source,
        })
    }

    /// Parses the policy start date
    pub fn policy_start_date(&self) -> Result<NaiveDate, ClaimError> {
        parse_claim_date(&self.policy_start).map_err(|source| ClaimError::InvalidDate {
            field: "policy_start",
            source,
        })
    }

    /// Returns the stored liability split when it is valid
    ///
    /// Ingested rows are not guaranteed to sum to 100, so this returns `None`
    /// instead of failing.
    pub fn liability(&self) -> Option<LiabilitySplit> {
        LiabilitySplit::new(self.insured_liability, self.claimant_liability).ok()
    }

    /// Applies a validated liability split
    pub fn apply_liability(&mut self, split: LiabilitySplit) {
        self.insured_liability = split.insured();
        self.claimant_liability = split.claimant();
    }

    /// Whether the claim amount exceeds the policy limit
    pub fn exceeds_policy_limit(&self) -> bool {
        self.claim_amount > self.policy_limit
    }
}
