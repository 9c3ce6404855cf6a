//! Infrastructure Database Layer
//!
//! This crate provides PostgreSQL access for the claims review service using
//! SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: [`repositories::ClaimsRepository`]
//! owns the SQL and maps rows, and [`adapters::PostgresClaimAdapter`]
//! implements the `ClaimRepository` port from `domain_claims` on top of it,
//! translating database errors into `PortError`s and retrying transient
//! failures.
//!
//! The claims table is loaded by an external ingestion process. The service
//! performs exactly three kinds of statement against it: a point read, a
//! point update of the liability columns, and an id search.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig};
//! use infra_db::adapters::PostgresClaimAdapter;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
//! let repository = Arc::new(PostgresClaimAdapter::new(pool));
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use adapters::PostgresClaimAdapter;
