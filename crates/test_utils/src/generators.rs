//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating claim records. Categorical
//! strategies mix known values with text the bundled schema has never seen.

use chrono::{Duration, NaiveDate};
use core_kernel::ClaimId;
use domain_claims::ClaimRecord;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating valid ClaimId values
pub fn claim_id_strategy() -> impl Strategy<Value = ClaimId> {
    "[A-Z0-9]{6,12}".prop_map(|raw| ClaimId::parse(raw).unwrap())
}

/// Strategy for ISO dates between 2018 and 2025
pub fn iso_date_strategy() -> impl Strategy<Value = String> {
    (0i64..2900i64).prop_map(|days| {
        let base = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        (base + Duration::days(days)).format("%Y-%m-%d").to_string()
    })
}

/// Strategy for a categorical value: one of `known`, or arbitrary text the
/// bundled schema has never seen
pub fn categorical_strategy(known: &'static [&'static str]) -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(known).prop_map(str::to_string),
        "[A-Za-z][A-Za-z ]{0,11}",
    ]
}

/// Strategy for state codes
pub fn state_strategy() -> impl Strategy<Value = String> {
    categorical_strategy(&["CA", "FL", "NY", "TX", "WA"])
}

/// Strategy for vehicle types
pub fn vehicle_type_strategy() -> impl Strategy<Value = String> {
    categorical_strategy(&["Sedan", "SUV", "Truck", "Motorcycle", "Hovercraft"])
}

/// Strategy for incident types
pub fn incident_type_strategy() -> impl Strategy<Value = String> {
    categorical_strategy(&["Collision", "Theft", "Fire", "Vandalism"])
}

/// Strategy for the reporting party
pub fn reported_by_strategy() -> impl Strategy<Value = String> {
    categorical_strategy(&["Insured", "Claimant", "Police", "Agent"])
}

/// Strategy for liability splits that sum to 100
pub fn liability_split_strategy() -> impl Strategy<Value = (i32, i32)> {
    (0i32..=100i32).prop_map(|insured| (insured, 100 - insured))
}

/// Strategy for complete, encodable claim records
pub fn claim_record_strategy() -> impl Strategy<Value = ClaimRecord> {
    (
        claim_id_strategy(),
        iso_date_strategy(),
        (state_strategy(), vehicle_type_strategy(), incident_type_strategy(), reported_by_strategy()),
        (18i32..90i32, 0i32..10i32),
        (100i64..50_000_000i64, 10_000i64..50_000_000i64),
        liability_split_strategy(),
    )
        .prop_map(
            |(claim_id, incident_date, categories, (age, prior), (amount, limit), (insured, claimant))| {
                let (state, vehicle_type, incident_type, reported_by) = categories;
                ClaimRecord {
                    claim_id,
                    policy_start: "2018-01-01".to_string(),
                    incident_date,
                    state: Some(state),
                    vehicle_type: Some(vehicle_type),
                    incident_type: Some(incident_type),
                    reported_by: Some(reported_by),
                    insured_age: age,
                    prior_claims_count: prior,
                    claim_amount: Decimal::new(amount, 2),
                    policy_limit: Decimal::new(limit, 2),
                    severity_score: 0.5,
                    fact_of_loss: None,
                    fraud_flag: None,
                    insured_liability: insured,
                    claimant_liability: claimant,
                }
            },
        )
}

/// Random loss narrative for records that need free text
pub fn fact_of_loss_text() -> String {
    Sentence(4..10).fake()
}
