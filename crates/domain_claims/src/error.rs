//! Claims domain errors

use core_kernel::{CoreError, PortError, TemporalError};
use thiserror::Error;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Invalid claim id: {0}")]
    InvalidClaimId(String),

    #[error("Liability percentage out of range: {field}={value} (must be 0-100)")]
    LiabilityOutOfRange { field: &'static str, value: i32 },

    #[error("The total liability must equal 100% (insured {insured}% + claimant {claimant}% = {total}%)")]
    InvalidLiabilitySplit { insured: i32, claimant: i32, total: i32 },

    #[error("Invalid claim date '{field}': {source}")]
    InvalidDate {
        field: &'static str,
        #[source]
        source: TemporalError,
    },

    #[error("Claim repository error: {0}")]
    Repository(PortError),
}

impl ClaimError {
    /// Returns true for errors caused by adjuster input rather than the system
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ClaimError::InvalidClaimId(_)
                | ClaimError::LiabilityOutOfRange { .. }
                | ClaimError::InvalidLiabilitySplit { .. }
        )
    }
}

impl From<PortError> for ClaimError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { id, .. } => ClaimError::ClaimNotFound(id),
            other => ClaimError::Repository(other),
        }
    }
}

impl From<CoreError> for ClaimError {
    fn from(err: CoreError) -> Self {
        ClaimError::InvalidClaimId(err.to_string())
    }
}
