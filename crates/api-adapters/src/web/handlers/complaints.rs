//! Complaint Store endpoints.
//!
//! Authorization lives in the services; handlers only translate HTTP.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use domains::{ComplaintId, ComplaintStatus};

use super::managed_complaint_id;
use crate::web::dto::{CreateComplaintRequest, ListComplaintsParams, UpdateStatusRequest};
use crate::web::error::ApiResult;
use crate::web::extract::{CurrentActor, JsonBody, QueryParams};
use crate::web::state::AppState;

// ---------------------------------------------------------------------------
// POST /complaints
// ---------------------------------------------------------------------------

/// Submit a complaint. Students only.
pub async fn create(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateComplaintRequest>,
) -> ApiResult<impl IntoResponse> {
    let complaint = state
        .complaints
        .create(&actor, &input.title, &input.description)
        .await?;
    state.metrics.complaint_submitted();

    Ok((StatusCode::CREATED, Json(complaint)))
}

// ---------------------------------------------------------------------------
// GET /complaints?student_id=
// ---------------------------------------------------------------------------

/// Without `student_id`: the caller's dashboard (own complaints for students,
/// all complaints for admins).
pub async fn list(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListComplaintsParams>,
) -> ApiResult<impl IntoResponse> {
    let complaints = match params.student_id {
        Some(student_id) => state.complaints.list_by_student(&actor, student_id).await?,
        None => state.complaints.list_visible(&actor).await?,
    };
    Ok(Json(complaints))
}

// GET /complaints/stats
pub async fn stats(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.complaints.status_counts(&actor).await?))
}

// GET /complaints/{id}
pub async fn get(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id: ComplaintId = id.parse()?;
    Ok(Json(state.complaints.get_by_id(&actor, id).await?))
}

// ---------------------------------------------------------------------------
// PATCH /complaints/{id}/status
// ---------------------------------------------------------------------------

/// Move a complaint to another status. Admin only.
pub async fn set_status(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UpdateStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let id = managed_complaint_id(&actor, &id)?;
    let status: ComplaintStatus = input.status.parse()?;
    let complaint = state.complaints.set_status(&actor, id, status).await?;
    state.metrics.status_changed(complaint.status);

    Ok(Json(complaint))
}

// DELETE /complaints/{id}
pub async fn delete(
    CurrentActor(actor): CurrentActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = managed_complaint_id(&actor, &id)?;
    state.complaints.delete(&actor, id).await?;
    state.metrics.complaint_deleted();

    Ok(StatusCode::NO_CONTENT)
}
