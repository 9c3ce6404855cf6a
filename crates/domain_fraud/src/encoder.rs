//! Feature encoding
//!
//! Converts a claim record into the fixed-width numeric row the model expects:
//!
//! 1. Derive `incident_month` (1-12) and `incident_dayofweek` (Monday = 0)
//!    from the incident date.
//! 2. Drop the columns excluded at training time ([`DROPPED_COLUMNS`]).
//! 3. Expand each categorical attribute into an indicator column named
//!    `<attribute>_<value>`. No reference category is dropped.
//! 4. [`reconcile`] the expanded row against the saved schema.
//!
//! A categorical value the model never saw simply produces an indicator that
//! is not in the schema, so every schema indicator for that attribute is zero.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use core_kernel::DateParts;
use domain_claims::ClaimRecord;

use crate::error::FraudError;
use crate::schema::FeatureSchema;
use crate::vector::EncodedFeatureVector;

/// Record attributes never fed to the model
pub const DROPPED_COLUMNS: [&str; 7] = [
    "fraud_flag",
    "claim_id",
    "severity_score",
    "claim_amount",
    "fact_of_loss",
    "policy_start",
    "incident_date",
];

/// Numeric columns carried into reconciliation, in expansion order
pub const NUMERIC_COLUMNS: [&str; 7] = [
    "insured_age",
    "prior_claims_count",
    "policy_limit",
    "insured_liability",
    "claimant_liability",
    "incident_month",
    "incident_dayofweek",
];

/// Attributes expanded into indicator columns
pub const CATEGORICAL_COLUMNS: [&str; 4] = ["state", "vehicle_type", "incident_type", "reported_by"];

/// Name of the indicator column for one categorical value
pub fn indicator_column(attribute: &str, value: &str) -> String {
    format!("{}_{}", attribute, value)
}

/// Expands a record into named columns before reconciliation
///
/// # Errors
///
/// `FraudError::MalformedRecord` when the incident date does not parse, a
/// categorical attribute is missing or blank, or the policy limit does not
/// fit in an `f64`.
pub fn expand(record: &ClaimRecord) -> Result<Vec<(String, f64)>, FraudError> {
    let incident = record
        .incident_date()
        .map_err(|e| FraudError::malformed(&record.claim_id, e.to_string()))?;
    let parts = DateParts::of(incident);

    let policy_limit = decimal_feature(record, "policy_limit", record.policy_limit)?;

    let numeric = [
        f64::from(record.insured_age),
        f64::from(record.prior_claims_count),
        policy_limit,
        f64::from(record.insured_liability),
        f64::from(record.claimant_liability),
        f64::from(parts.month),
        f64::from(parts.day_of_week),
    ];

    let mut expanded: Vec<(String, f64)> = NUMERIC_COLUMNS
        .iter()
        .zip(numeric)
        .map(|(name, value)| (name.to_string(), value))
        .collect();

    let categorical = [
        &record.state,
        &record.vehicle_type,
        &record.incident_type,
        &record.reported_by,
    ];
    for (attribute, value) in CATEGORICAL_COLUMNS.iter().zip(categorical) {
        let value = value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                FraudError::malformed(&record.claim_id, format!("missing {}", attribute))
            })?;
        expanded.push((indicator_column(attribute, value), 1.0));
    }

    Ok(expanded)
}

fn decimal_feature(record: &ClaimRecord, name: &str, value: Decimal) -> Result<f64, FraudError> {
    value
        .to_f64()
        .ok_or_else(|| FraudError::malformed(&record.claim_id, format!("{} is not representable", name)))
}

/// Aligns an expanded row with the schema
///
/// Schema columns absent from `expanded` are filled with 0.0, columns not in
/// the schema are discarded, and the result is ordered exactly as the schema.
pub fn reconcile(expanded: &[(String, f64)], schema: &FeatureSchema) -> EncodedFeatureVector {
    let lookup: HashMap<&str, f64> = expanded
        .iter()
        .map(|(name, value)| (name.as_str(), *value))
        .collect();

    let values = schema
        .columns()
        .iter()
        .map(|column| lookup.get(column.as_str()).copied().unwrap_or(0.0))
        .collect();

    EncodedFeatureVector::from_schema(schema, values)
}

/// Claim record encoder bound to one feature schema
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: Arc<FeatureSchema>,
}

impl FeatureEncoder {
    /// Creates an encoder for a loaded schema
    pub fn new(schema: Arc<FeatureSchema>) -> Self {
        for dropped in DROPPED_COLUMNS {
            if schema.contains(dropped) {
                warn!(column = dropped, "Schema lists a column the encoder always drops; it will be zero");
            }
        }
        Self { schema }
    }

    /// Loads the schema artifact and creates an encoder for it
    pub fn load(schema_path: impl AsRef<std::path::Path>) -> Result<Self, FraudError> {
        Ok(Self::new(Arc::new(FeatureSchema::load(schema_path)?)))
    }

    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    /// Encodes one claim record
    pub fn encode(&self, record: &ClaimRecord) -> Result<EncodedFeatureVector, FraudError> {
        let expanded = expand(record)?;
        let unmatched = expanded
            .iter()
            .filter(|(name, _)| !self.schema.contains(name))
            .count();
        if unmatched > 0 {
            debug!(claim_id = %record.claim_id, unmatched, "Columns outside the schema discarded");
        }
        Ok(reconcile(&expanded, &self.schema))
    }
}
