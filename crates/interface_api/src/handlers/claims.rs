//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use validator::Validate;

use core_kernel::ClaimId;

use crate::auth::{permissions, require, Claims};
use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

/// Lists claim ids containing the query fragment
pub async fn search_claims(
    State(state): State<AppState>,
    Extension(user): Extension<Claims>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    require(&user, permissions::CLAIM_READ)?;
    query.validate()?;

    let ids = state.context.claims.search(&query.q, query.limit).await?;

    Ok(Json(SearchResponse {
        query: query.q,
        claim_ids: ids.iter().map(|id| id.as_str().to_string()).collect(),
    }))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Extension(user): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ClaimResponse>, ApiError> {
    require(&user, permissions::CLAIM_READ)?;
    let id = ClaimId::parse(&id)?;

    let claim = state.context.claims.lookup(&id).await?;
    Ok(Json(claim.into()))
}

/// Records the adjuster's liability decision
pub async fn update_liability(
    State(state): State<AppState>,
    Extension(user): Extension<Claims>,
    Path(id): Path<String>,
    Json(request): Json<UpdateLiabilityRequest>,
) -> Result<Json<LiabilityResponse>, ApiError> {
    require(&user, permissions::CLAIM_WRITE)?;
    request.validate()?;
    let id = ClaimId::parse(&id)?;

    let split = state
        .context
        .claims
        .save_liability(&id, request.insured_liability, request.claimant_liability)
        .await?;

    tracing::info!(claim_id = %id, adjuster = %user.sub, "Liability decision recorded");

    Ok(Json(LiabilityResponse {
        claim_id: id.as_str().to_string(),
        insured_liability: split.insured(),
        claimant_liability: split.claimant(),
    }))
}
