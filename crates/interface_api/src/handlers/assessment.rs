//! Fraud assessment handler

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use tracing::info;
use validator::Validate;

use core_kernel::ClaimId;
use domain_fraud::DEFAULT_TOP_FEATURES;

use crate::auth::{permissions, require, Claims};
use crate::dto::assessment::*;
use crate::{error::ApiError, AppState};

/// Scores a claim and explains the score
///
/// The explanation shows the `top` features with the largest absolute
/// contribution (default 5).
pub async fn assess_claim(
    State(state): State<AppState>,
    Extension(user): Extension<Claims>,
    Path(id): Path<String>,
    Query(query): Query<AssessmentQuery>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    require(&user, permissions::CLAIM_READ)?;
    query.validate()?;
    let id = ClaimId::parse(&id)?;

    let context = &state.context;
    let claim = context.claims.lookup(&id).await?;
    let vector = context.encoder.encode(&claim)?;
    let assessment = context.scorer.score(&vector)?;
    let explanation = context.explainer.explain(&vector)?;

    info!(
        claim_id = %id,
        probability = assessment.probability,
        flagged = assessment.is_flagged(),
        "Claim assessed"
    );

    Ok(Json(AssessmentResponse::new(
        id.as_str(),
        assessment,
        &explanation,
        query.top.unwrap_or(DEFAULT_TOP_FEATURES),
    )))
}
