use axum::extract::State;

use crate::api::errors::ApiError;
use crate::api::extract::Json;
use crate::api::middleware::AdminAuth;
use crate::api::state::AppState;
use crate::assistant::{AssistantAnswer, AssistantError, AssistantQuestion};

/// Answer a free-text question about the census
///
/// POST /api/assistant/ask
pub async fn ask(
    State(state): State<AppState>,
    auth: AdminAuth,
    Json(req): Json<AssistantQuestion>,
) -> Result<Json<AssistantAnswer>, ApiError> {
    let assistant = state.assistant.as_ref().ok_or(AssistantError::Disabled)?;

    tracing::info!(admin_id = auth.admin_id, "Assistant question submitted");
    let answer = assistant.ask(&req.question).await?;

    Ok(Json(answer))
}
