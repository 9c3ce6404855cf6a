//! PostgreSQL Claim Adapter
//!
//! This module provides the database adapter for the claims domain,
//! implementing the `ClaimRepository` port using PostgreSQL via the
//! `ClaimsRepository`.
//!
//! # Overview
//!
//! The `PostgresClaimAdapter` serves as the bridge between the domain layer's
//! port interface and the database layer. It:
//!
//! - Translates domain requests into repository operations
//! - Converts database row types back to domain models
//! - Handles error translation between database and port errors
//! - Retries transient failures with the configured `RetryPolicy`
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresClaimAdapter;
//! use domain_claims::ClaimRepository;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn ClaimRepository> = Arc::new(PostgresClaimAdapter::new(pool));
//! let claim = port.fetch_by_id(&claim_id).await?;
//! ```

use std::time::Instant;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use core_kernel::{
    AdapterHealth, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PortError, RetryPolicy,
};
use domain_claims::{ClaimRecord, ClaimRepository, ClaimSearch, LiabilitySplit};

use crate::error::DatabaseError;
use crate::repositories::claims::{ClaimRow, ClaimsRepository};

const ADAPTER_ID: &str = "postgres-claims";

/// PostgreSQL-backed implementation of the ClaimRepository port
///
/// # Error Handling
///
/// Database errors are translated to `PortError` variants:
/// - `DatabaseError::NotFound` -> `PortError::NotFound`
/// - Connection failures and pool exhaustion -> `PortError::Connection`
/// - Constraint violations -> `PortError::Validation`
/// - Other errors -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresClaimAdapter {
    repository: ClaimsRepository,
    pool: PgPool,
    retry: RetryPolicy,
}

impl PostgresClaimAdapter {
    /// Creates a new PostgreSQL claim adapter with the default retry policy
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
            retry: RetryPolicy::default(),
        }
    }

    /// Replaces the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &ClaimsRepository {
        &self.repository
    }
}

impl DomainPort for PostgresClaimAdapter {}

#[async_trait]
impl HealthCheckable for PostgresClaimAdapter {
    /// Checks database connectivity with `SELECT 1`
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::new(ADAPTER_ID, AdapterHealth::Healthy, latency_ms, None),
            Err(e) => HealthCheckResult::new(
                ADAPTER_ID,
                AdapterHealth::Unhealthy,
                latency_ms,
                Some(format!("Database error: {}", e)),
            ),
        }
    }
}

#[async_trait]
impl ClaimRepository for PostgresClaimAdapter {
    #[instrument(skip(self), fields(claim_id = %id))]
    async fn fetch_by_id(&self, id: &ClaimId) -> Result<ClaimRecord, PortError> {
        let row = self
            .retry
            .run("claims.fetch_by_id", move || async move {
                self.repository
                    .get_by_id(id.as_str())
                    .await
                    .map_err(db_to_port_error)
            })
            .await?;

        debug!("Claim row fetched");
        row_to_claim(row)
    }

    #[instrument(skip(self), fields(claim_id = %id, insured = split.insured(), claimant = split.claimant()))]
    async fn update_liability(&self, id: &ClaimId, split: LiabilitySplit) -> Result<(), PortError> {
        self.retry
            .run("claims.update_liability", move || async move {
                self.repository
                    .update_liability(id.as_str(), split.insured(), split.claimant())
                    .await
                    .map_err(db_to_port_error)
            })
            .await
    }

    #[instrument(skip(self), fields(fragment = search.fragment(), limit = search.limit()))]
    async fn search_ids(&self, search: &ClaimSearch) -> Result<Vec<ClaimId>, PortError> {
        let limit = i64::try_from(search.limit()).unwrap_or(i64::MAX);
        let ids = self
            .retry
            .run("claims.search_ids", move || async move {
                self.repository
                    .search_ids(search.fragment(), limit)
                    .await
                    .map_err(db_to_port_error)
            })
            .await?;

        Ok(parse_stored_ids(ids))
    }
}

/// Converts stored ids to claim ids, skipping and logging any that cannot
/// be represented so one bad row does not fail the whole search
fn parse_stored_ids(raw_ids: Vec<String>) -> Vec<ClaimId> {
    raw_ids
        .into_iter()
        .filter_map(|raw| match ClaimId::parse(&raw) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(claim_id = %raw, error = %e, "Skipping unrepresentable claim id");
                None
            }
        })
        .collect()
}

/// Converts a database error to a port error
fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound { entity, id } => PortError::not_found(entity, id),
        DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted => PortError::Connection {
            message: e.to_string(),
            source: Some(Box::new(e)),
        },
        DatabaseError::ConstraintViolation(message) => PortError::validation(message),
        other => PortError::Internal {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

/// Converts a claims row to the domain record
fn row_to_claim(row: ClaimRow) -> Result<ClaimRecord, PortError> {
    let claim_id = ClaimId::parse(&row.claim_id).map_err(|e| {
        PortError::internal(format!("Stored claim id '{}' is invalid: {}", row.claim_id, e))
    })?;

    Ok(ClaimRecord {
        claim_id,
        policy_start: row.policy_start,
        incident_date: row.incident_date,
        state: row.state,
        vehicle_type: row.vehicle_type,
        incident_type: row.incident_type,
        reported_by: row.reported_by,
        insured_age: row.insured_age,
        prior_claims_count: row.prior_claims_count,
        claim_amount: row.claim_amount,
        policy_limit: row.policy_limit,
        severity_score: row.severity_score,
        fact_of_loss: row.fact_of_loss,
        fraud_flag: row.fraud_flag,
        insured_liability: row.insured_liability,
        claimant_liability: row.claimant_liability,
    })
}
