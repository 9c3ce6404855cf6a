//! Liability split between insured and claimant

use serde::{Deserialize, Serialize};

use crate::error::ClaimError;

/// Required total of a liability split, in percent
pub const LIABILITY_TOTAL: i32 = 100;

/// A validated allocation of fault between insured and claimant
///
/// Both percentages lie in 0..=100 and always sum to exactly 100. The only
/// constructor is [`LiabilitySplit::new`], so a value of this type never
/// holds an invalid split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LiabilitySplit {
    insured: i32,
    claimant: i32,
}

impl LiabilitySplit {
    /// Validates and builds a split
    ///
    /// # Errors
    ///
    /// * `ClaimError::LiabilityOutOfRange` if either value is outside 0..=100
    /// * `ClaimError::InvalidLiabilitySplit` if the values do not sum to 100
    pub fn new(insured: i32, claimant: i32) -> Result<Self, ClaimError> {
        check_range("insured_liability", insured)?;
        check_range("claimant_liability", claimant)?;

        let total = insured + claimant;
        if total != LIABILITY_TOTAL {
            return Err(ClaimError::InvalidLiabilitySplit {
                insured,
                claimant,
                total,
            });
        }

        Ok(Self { insured, claimant })
    }

    pub fn insured(&self) -> i32 {
        self.insured
    }

    pub fn claimant(&self) -> i32 {
        self.claimant
    }
}

impl<'de> Deserialize<'de> for LiabilitySplit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            insured: i32,
            claimant: i32,
        }

        let raw = Raw::deserialize(deserializer)?;
        LiabilitySplit::new(raw.insured, raw.claimant).map_err(serde::de::Error::custom)
    }
}

fn check_range(field: &'static str, value: i32) -> Result<(), ClaimError> {
    if (0..=LIABILITY_TOTAL).contains(&value) {
        Ok(())
    } else {
        Err(ClaimError::LiabilityOutOfRange { field, value })
    }
}
