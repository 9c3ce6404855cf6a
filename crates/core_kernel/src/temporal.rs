//! Date handling for claim records
//!
//! Claim dates arrive from the ingestion process as text. This module parses
//! the accepted layouts and decomposes a date into the calendar parts used as
//! model features.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date-only layouts accepted for claim dates
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Date-time layouts accepted for claim dates; the time part is discarded
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Date value is empty")]
    Empty,

    #[error("Unrecognized date format: '{0}'")]
    Unparseable(String),
}

/// Parses a text claim date
///
/// # Arguments
///
/// * `raw` - The stored date text, e.g. `2024-03-15` or `2024-03-15 00:00:00`
///
/// # Errors
///
/// Returns `TemporalError::Empty` for blank input and
/// `TemporalError::Unparseable` when no accepted layout matches.
pub fn parse_claim_date(raw: &str) -> Result<NaiveDate, TemporalError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(TemporalError::Empty);
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }

    Err(TemporalError::Unparseable(value.to_string()))
}

/// Calendar parts derived from a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    /// Month of year, 1 through 12
    pub month: u32,
    /// Day of week with Monday = 0 through Sunday = 6
    pub day_of_week: u32,
}

impl DateParts {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day_of_week: date.weekday().num_days_from_monday(),
        }
    }
}

impl From<NaiveDate> for DateParts {
    fn from(date: NaiveDate) -> Self {
        Self::of(date)
    }
}
