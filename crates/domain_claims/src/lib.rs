//! Claims Domain
//!
//! This crate models the claim record under review and the one mutation an
//! adjuster may make to it: the liability split between insured and claimant.
//!
//! # Review Flow
//!
//! ```text
//! search ids -> lookup claim -> (score + explain elsewhere) -> save liability split
//! ```
//!
//! Storage is reached through the [`ClaimRepository`] port; the PostgreSQL
//! adapter lives in `infra_db`, and an in-memory adapter is available behind
//! the `mock` feature.

pub mod claim;
pub mod liability;
pub mod ports;
pub mod service;
pub mod error;

pub use claim::ClaimRecord;
pub use liability::LiabilitySplit;
pub use ports::{ClaimRepository, ClaimSearch, MIN_SEARCH_FRAGMENT_LEN, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
pub use service::ClaimReviewService;
pub use error::ClaimError;
