//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims review test suite.
//!
//! # Modules
//!
//! - `fixtures`: Sample claims and the bundled fraud artifacts
//! - `builders`: Builder for claim records with sensible defaults
//! - `database`: Database test helpers and container management
//! - `assertions`: Assertion helpers for scores and attributions
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
