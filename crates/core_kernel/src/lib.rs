//! Core Kernel - Foundational types and utilities for the claims review system
//!
//! This crate provides the building blocks shared by every domain module:
//! - Claim identifiers as validated value objects
//! - Date parsing for text-stored claim dates
//! - Port error taxonomy and adapter health reporting
//! - The bounded retry policy used at external boundaries

pub mod identifiers;
pub mod temporal;
pub mod ports;
pub mod retry;
pub mod error;

pub use identifiers::ClaimId;
pub use temporal::{parse_claim_date, DateParts, TemporalError};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use retry::RetryPolicy;
pub use error::CoreError;
