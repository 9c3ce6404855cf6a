//! Domain Adapters
//!
//! Adapter implementations for domain ports, connecting domain interfaces to
//! the PostgreSQL database layer. Each adapter:
//! - Implements the domain's port trait
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresClaimAdapter;
//! use domain_claims::ClaimRepository;
//!
//! let adapter = PostgresClaimAdapter::new(pool);
//! let claim = adapter.fetch_by_id(&claim_id).await?;
//! ```

pub mod claims;

pub use claims::PostgresClaimAdapter;
