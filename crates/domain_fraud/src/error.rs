//! Fraud domain errors

use thiserror::Error;

/// Errors that can occur while encoding, scoring or explaining a claim
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FraudError {
    #[error("Feature schema unavailable: {0}")]
    SchemaUnavailable(String),

    #[error("Fraud model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Malformed claim record {claim_id}: {reason}")]
    MalformedRecord { claim_id: String, reason: String },

    #[error("Feature shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Invalid fraud threshold {0}: must be greater than 0 and at most 1")]
    InvalidThreshold(f64),
}

impl FraudError {
    pub(crate) fn malformed(claim_id: impl ToString, reason: impl Into<String>) -> Self {
        FraudError::MalformedRecord {
            claim_id: claim_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors that can only be fixed by replacing an artifact
    pub fn is_artifact_error(&self) -> bool {
        matches!(
            self,
            FraudError::SchemaUnavailable(_) | FraudError::ModelUnavailable(_)
        )
    }
}
