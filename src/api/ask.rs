//! Question answering endpoint

use axum::extract::State;
use tracing::info;

use super::state::AppState;
use super::types::{ApiError, AskRequest, AskResponse, Json};
use crate::domain::PipelineRequest;

/// `POST /ask`
pub async fn ask(
    State(state): State<AppState>,
    Json(body): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let user_id = body.user_id.clone();
    let request = PipelineRequest::from(body);

    info!(request_id = %request.request_id, user_id = ?user_id, "Question received");

    let outcome = state.pipeline.run(request).await?;

    Ok(Json(AskResponse::from_outcome(outcome, user_id)))
}
