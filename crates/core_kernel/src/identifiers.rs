//! Strongly-typed identifiers for domain entities
//!
//! Claim identifiers are opaque codes assigned by the ingestion process
//! (e.g. `XAJI0Y6DP`). Wrapping them in a newtype keeps a claim id from being
//! confused with any other string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Maximum accepted identifier length
pub const MAX_ID_LEN: usize = 64;

/// Identifier of a claim record
///
/// The value is opaque: any non-blank text up to `MAX_ID_LEN` characters is
/// accepted, since ids come from an external ingestion process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClaimId(String);

impl ClaimId {
    /// Creates a claim identifier after trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` when the value is blank or longer than
    /// `MAX_ID_LEN` characters.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, CoreError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CoreError::validation("Claim ID must not be empty"));
        }
        if trimmed.chars().count() > MAX_ID_LEN {
            return Err(CoreError::validation(format!(
                "Claim ID exceeds {} characters",
                MAX_ID_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClaimId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClaimId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ClaimId> for String {
    fn from(id: ClaimId) -> String {
        id.0
    }
}

impl AsRef<str> for ClaimId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
