//! Document assistant handler

use axum::{extract::State, Extension, Json};
use validator::Validate;

use domain_assistant::Question;

use crate::auth::{permissions, require, Claims};
use crate::dto::assistant::*;
use crate::{error::ApiError, AppState};

/// Answers a question about the claims-handling manual
///
/// An unreachable assistant yields 503; nothing else in the API depends on it.
pub async fn ask(
    State(state): State<AppState>,
    Extension(user): Extension<Claims>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    require(&user, permissions::ASSISTANT_USE)?;
    request.validate()?;
    let question = Question::parse(&request.question)?;

    let answer = state.context.assistant.answer(&question).await?;
    Ok(Json(AskResponse { answer }))
}
