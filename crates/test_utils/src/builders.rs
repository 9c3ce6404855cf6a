//! Test Data Builders
//!
//! Provides a builder for claim records with sensible defaults. Tests set
//! only the fields they care about and inherit the low-risk fixture for
//! everything else.

use core_kernel::ClaimId;
use domain_claims::ClaimRecord;
use rust_decimal::Decimal;

use crate::fixtures::ClaimFixtures;

/// Builder for constructing claim records
pub struct ClaimRecordBuilder {
    record: ClaimRecord,
}

impl Default for ClaimRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimRecordBuilder {
    /// Creates a new builder seeded from the low-risk fixture
    pub fn new() -> Self {
        Self {
            record: ClaimFixtures::low_risk(),
        }
    }

    /// Sets the claim ID
    ///
    /// # Panics
    ///
    /// Panics when `id` is not a valid claim identifier
    pub fn with_id(mut self, id: &str) -> Self {
        self.record.claim_id = ClaimId::parse(id).unwrap();
        self
    }

    pub fn with_incident_date(mut self, date: impl Into<String>) -> Self {
        self.record.incident_date = date.into();
        self
    }

    pub fn with_policy_start(mut self, date: impl Into<String>) -> Self {
        self.record.policy_start = date.into();
        self
    }

    /// Sets the state; `None` models a missing value
    pub fn with_state(mut self, state: Option<&str>) -> Self {
        self.record.state = state.map(str::to_string);
        self
    }

    pub fn with_vehicle_type(mut self, vehicle_type: Option<&str>) -> Self {
        self.record.vehicle_type = vehicle_type.map(str::to_string);
        self
    }

    pub fn with_incident_type(mut self, incident_type: Option<&str>) -> Self {
        self.record.incident_type = incident_type.map(str::to_string);
        self
    }

    pub fn with_reported_by(mut self, reported_by: Option<&str>) -> Self {
        self.record.reported_by = reported_by.map(str::to_string);
        self
    }

    pub fn with_insured_age(mut self, age: i32) -> Self {
        self.record.insured_age = age;
        self
    }

    pub fn with_prior_claims(mut self, count: i32) -> Self {
        self.record.prior_claims_count = count;
        self
    }

    pub fn with_claim_amount(mut self, amount: Decimal) -> Self {
        self.record.claim_amount = amount;
        self
    }

    pub fn with_policy_limit(mut self, limit: Decimal) -> Self {
        self.record.policy_limit = limit;
        self
    }

    pub fn with_fact_of_loss(mut self, text: impl Into<String>) -> Self {
        self.record.fact_of_loss = Some(text.into());
        self
    }

    /// Sets both liability columns without validating their sum
    pub fn with_liability(mut self, insured: i32, claimant: i32) -> Self {
        self.record.insured_liability = insured;
        self.record.claimant_liability = claimant;
        self
    }

    /// Builds the claim record
    pub fn build(self) -> ClaimRecord {
        self.record
    }
}
