//! Claims repository implementation
//!
//! This module provides database access for the claims table: a point read,
//! a point update of the liability split, and an identifier search.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;

use crate::error::DatabaseError;

/// Columns cast to the row's Rust types, so tables typed by the ingestion
/// step (BIGINT integers, DOUBLE PRECISION amounts) decode like ours
const CLAIM_COLUMNS: &str = r#"
    claim_id,
    policy_start::TEXT AS policy_start,
    incident_date::TEXT AS incident_date,
    state,
    vehicle_type,
    incident_type,
    reported_by,
    insured_age::INT4 AS insured_age,
    COALESCE(prior_claims_count, 0)::INT4 AS prior_claims_count,
    claim_amount::NUMERIC AS claim_amount,
    policy_limit::NUMERIC AS policy_limit,
    COALESCE(severity_score, 0)::FLOAT8 AS severity_score,
    fact_of_loss,
    fraud_flag::INT4 AS fraud_flag,
    COALESCE(insured_liability, 0)::INT4 AS insured_liability,
    COALESCE(claimant_liability, 0)::INT4 AS claimant_liability
"#;

/// Repository for the claims table
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    /// Creates a new ClaimsRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a claim by its identifier
    ///
    /// # Returns
    ///
    /// The claim row or `DatabaseError::NotFound`
    pub async fn get_by_id(&self, claim_id: &str) -> Result<ClaimRow, DatabaseError> {
        let sql = format!("SELECT {} FROM claims WHERE claim_id = $1", CLAIM_COLUMNS);

        sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))
    }

    /// Sets both liability percentages of one claim
    ///
    /// Callers validate the split; the table only enforces the 0-100 range.
    pub async fn update_liability(
        &self,
        claim_id: &str,
        insured: i32,
        claimant: i32,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE claims
            SET insured_liability = $2,
                claimant_liability = $3
            WHERE claim_id = $1
            "#,
        )
        .bind(claim_id)
        .bind(insured)
        .bind(claimant)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Claim", claim_id));
        }

        debug!(claim_id, insured, claimant, "Liability columns updated");
        Ok(())
    }

    /// Lists claim ids containing `fragment`, case-insensitively
    ///
    /// Ids are returned in byte order, at most `limit` of them.
    pub async fn search_ids(&self, fragment: &str, limit: i64) -> Result<Vec<String>, DatabaseError> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT claim_id
            FROM claims
            WHERE claim_id ILIKE $1 ESCAPE '\'
            ORDER BY claim_id COLLATE "C"
            LIMIT $2
            "#,
        )
        .bind(contains_pattern(fragment))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

/// Builds an `ILIKE` pattern matching `fragment` anywhere, with LIKE
/// metacharacters in the fragment matched literally
pub fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Database row for a claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub claim_id: String,
    pub policy_start: String,
    pub incident_date: String,
    pub state: Option<String>,
    pub vehicle_type: Option<String>,
    pub incident_type: Option<String>,
    pub reported_by: Option<String>,
    pub insured_age: i32,
    pub prior_claims_count: i32,
    pub claim_amount: Decimal,
    pub policy_limit: Decimal,
    pub severity_score: f64,
    pub fact_of_loss: Option<String>,
    pub fraud_flag: Option<i32>,
    pub insured_liability: i32,
    pub claimant_liability: i32,
}
