//! Claim review service
//!
//! Request-level operations over the repository port: lookup, id search and
//! the liability save. Input validation happens here, before storage is
//! touched.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use core_kernel::ClaimId;

use crate::claim::ClaimRecord;
use crate::error::ClaimError;
use crate::liability::LiabilitySplit;
use crate::ports::{ClaimRepository, ClaimSearch, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};

/// Application service for claim review
#[derive(Clone)]
pub struct ClaimReviewService {
    repository: Arc<dyn ClaimRepository>,
    search_limit: usize,
}

impl ClaimReviewService {
    /// Creates a service with the default search limit
    pub fn new(repository: Arc<dyn ClaimRepository>) -> Self {
        Self {
            repository,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Overrides the number of ids returned when the caller gives no limit
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit.clamp(1, MAX_SEARCH_LIMIT);
        self
    }

    pub fn repository(&self) -> &Arc<dyn ClaimRepository> {
        &self.repository
    }

    /// Looks up a claim by id
    ///
    /// # Errors
    ///
    /// `ClaimError::ClaimNotFound` when no claim has this id
    #[instrument(skip(self), fields(claim_id = %id))]
    pub async fn lookup(&self, id: &ClaimId) -> Result<ClaimRecord, ClaimError> {
        let claim = self.repository.fetch_by_id(id).await?;
        debug!("Claim loaded");
        Ok(claim)
    }

    /// Searches claim ids containing `fragment`
    ///
    /// Fragments shorter than two characters return an empty list without
    /// querying storage.
    #[instrument(skip(self))]
    pub async fn search(&self, fragment: &str, limit: Option<usize>) -> Result<Vec<ClaimId>, ClaimError> {
        let search = ClaimSearch::new(fragment, limit.unwrap_or(self.search_limit));
        if !search.is_searchable() {
            debug!("Fragment too short, skipping search");
            return Ok(Vec::new());
        }

        let ids = self.repository.search_ids(&search).await?;
        debug!(matches = ids.len(), "Search complete");
        Ok(ids)
    }

    /// Validates and persists a liability decision
    ///
    /// # Errors
    ///
    /// * `ClaimError::LiabilityOutOfRange` / `ClaimError::InvalidLiabilitySplit`
    ///   when the split is invalid; nothing is written in that case
    /// * `ClaimError::ClaimNotFound` when no claim has this id
    #[instrument(skip(self), fields(claim_id = %id))]
    pub async fn save_liability(
        &self,
        id: &ClaimId,
        insured: i32,
        claimant: i32,
    ) -> Result<LiabilitySplit, ClaimError> {
        let split = LiabilitySplit::new(insured, claimant)?;
        self.repository.update_liability(id, split).await?;
        info!(insured, claimant, "Liability decision saved");
        Ok(split)
    }
}
