//! Claims Domain Ports
//!
//! The claims table is owned by an external ingestion process. This module
//! defines the port through which the review service reads claims, searches
//! their identifiers and writes the one mutable attribute, the liability split.
//!
//! # Adapters
//!
//! - **PostgreSQL**: `infra_db::adapters::PostgresClaimAdapter`
//! - **In-memory**: [`mock::InMemoryClaimRepository`] (feature `mock`)
//!
//! ```rust,ignore
//! let repository: Arc<dyn ClaimRepository> = Arc::new(PostgresClaimAdapter::new(pool));
//! let service = ClaimReviewService::new(repository);
//! ```

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, HealthCheckable, PortError};

use crate::claim::ClaimRecord;
use crate::liability::LiabilitySplit;

/// Fragments shorter than this never reach storage
pub const MIN_SEARCH_FRAGMENT_LEN: usize = 2;

/// Number of ids returned when the caller gives no limit
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Hard cap on ids returned by one search
pub const MAX_SEARCH_LIMIT: usize = 50;

/// Identifier search request
///
/// Matching is a case-insensitive substring match on the claim id; results
/// are ordered lexicographically by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSearch {
    fragment: String,
    limit: usize,
}

impl ClaimSearch {
    /// Builds a search, trimming the fragment and clamping the limit to
    /// `1..=MAX_SEARCH_LIMIT`
    pub fn new(fragment: impl AsRef<str>, limit: usize) -> Self {
        Self {
            fragment: fragment.as_ref().trim().to_string(),
            limit: limit.clamp(1, MAX_SEARCH_LIMIT),
        }
    }

    /// Builds a search with the default limit
    pub fn with_default_limit(fragment: impl AsRef<str>) -> Self {
        Self::new(fragment, DEFAULT_SEARCH_LIMIT)
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether the fragment is long enough to be worth querying
    pub fn is_searchable(&self) -> bool {
        self.fragment.chars().count() >= MIN_SEARCH_FRAGMENT_LEN
    }

    /// Case-insensitive substring test used by in-process adapters
    pub fn matches(&self, id: &ClaimId) -> bool {
        id.as_str()
            .to_lowercase()
            .contains(&self.fragment.to_lowercase())
    }
}

/// Port for claim storage
///
/// Concurrent edits to the same claim are last-write-wins; no locking is
/// performed.
#[async_trait]
pub trait ClaimRepository: DomainPort + HealthCheckable {
    /// Point lookup of a claim
    ///
    /// # Returns
    ///
    /// The claim, or `PortError::NotFound`
    async fn fetch_by_id(&self, id: &ClaimId) -> Result<ClaimRecord, PortError>;

    /// Point update of the liability columns
    ///
    /// The split type guarantees the percentages sum to 100.
    ///
    /// # Returns
    ///
    /// `Ok(())`, or `PortError::NotFound` when no row has this id
    async fn update_liability(&self, id: &ClaimId, split: LiabilitySplit) -> Result<(), PortError>;

    /// Identifier search
    ///
    /// # Returns
    ///
    /// At most `search.limit()` ids in lexicographic order
    async fn search_ids(&self, search: &ClaimSearch) -> Result<Vec<ClaimId>, PortError>;
}

/// In-memory implementation of ClaimRepository for testing
///
/// Claims are kept in a `BTreeMap`, which yields ids in lexicographic order
/// the same way the SQL adapter does.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// In-memory mock implementation of ClaimRepository
    #[derive(Debug, Default)]
    pub struct InMemoryClaimRepository {
        claims: Arc<RwLock<BTreeMap<ClaimId, ClaimRecord>>>,
        updates: AtomicUsize,
    }

    impl InMemoryClaimRepository {
        /// Creates an empty repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with claims for testing
        pub fn with_claims(claims: impl IntoIterator<Item = ClaimRecord>) -> Self {
            let map = claims
                .into_iter()
                .map(|claim| (claim.claim_id.clone(), claim))
                .collect();
            Self {
                claims: Arc::new(RwLock::new(map)),
                updates: AtomicUsize::new(0),
            }
        }

        /// Inserts or replaces a claim
        pub async fn insert(&self, claim: ClaimRecord) {
            self.claims.write().await.insert(claim.claim_id.clone(), claim);
        }

        /// Number of successful liability updates performed
        pub fn update_count(&self) -> usize {
            self.updates.load(Ordering::SeqCst)
        }
    }

    impl DomainPort for InMemoryClaimRepository {}

    #[async_trait]
    impl HealthCheckable for InMemoryClaimRepository {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::new(
                "in-memory-claims",
                AdapterHealth::Healthy,
                0,
                Some("In-memory adapter always healthy".to_string()),
            )
        }
    }

    #[async_trait]
    impl ClaimRepository for InMemoryClaimRepository {
        async fn fetch_by_id(&self, id: &ClaimId) -> Result<ClaimRecord, PortError> {
            self.claims
                .read()
                .await
                .get(id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Claim", id))
        }

        async fn update_liability(&self, id: &ClaimId, split: LiabilitySplit) -> Result<(), PortError> {
            let mut claims = self.claims.write().await;
            let claim = claims
                .get_mut(id)
                .ok_or_else(|| PortError::not_found("Claim", id))?;
            claim.apply_liability(split);
            self.updates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn search_ids(&self, search: &ClaimSearch) -> Result<Vec<ClaimId>, PortError> {
            Ok(self
                .claims
                .read()
                .await
                .keys()
                .filter(|id| search.matches(id))
                .take(search.limit())
                .cloned()
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_limit_is_clamped() {
        assert_eq!(ClaimSearch::new("XA", 0).limit(), 1);
        assert_eq!(ClaimSearch::new("XA", 500).limit(), MAX_SEARCH_LIMIT);
        assert_eq!(ClaimSearch::with_default_limit("XA").limit(), DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn test_search_requires_two_characters() {
        assert!(!ClaimSearch::with_default_limit(" X ").is_searchable());
        assert!(ClaimSearch::with_default_limit("XA").is_searchable());
    }

    #[test]
    fn test_search_matches_case_insensitive_substring() {
        let search = ClaimSearch::with_default_limit("ji0");
        assert!(search.matches(&ClaimId::parse("XAJI0Y6DP").unwrap()));
        assert!(!search.matches(&ClaimId::parse("XAJ10Y6DP").unwrap()));
    }
}
