//! Repository implementations
//!
//! Repositories encapsulate SQL queries and map between database rows and
//! row types. Queries are checked at runtime so the crate builds without a
//! live database.

pub mod claims;

pub use claims::{ClaimRow, ClaimsRepository};
