//! Reply Store endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domains::ComplaintId;

use super::managed_complaint_id;
use crate::web::dto::CreateReplyRequest;
use crate::web::error::ApiResult;
use crate::web::extract::{CurrentActor, JsonBody};
use crate::web::state::AppState;

// POST /complaints/{id}/replies
pub async fn add(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<CreateReplyRequest>,
) -> ApiResult<impl IntoResponse> {
    let complaint_id = managed_complaint_id(&actor, &id)?;
    let reply = state
        .replies
        .add(&actor, complaint_id, &input.message)
        .await?;
    state.metrics.reply_added();

    Ok((StatusCode::CREATED, Json(reply)))
}

// GET /complaints/{id}/replies
pub async fn list(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let complaint_id: ComplaintId = id.parse()?;
    Ok(Json(
        state.replies.list_by_complaint(&actor, complaint_id).await?,
    ))
}
