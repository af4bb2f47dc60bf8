//! Identity provider endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::dto::{LoginRequest, SessionResponse, SignupRequest};
use crate::web::error::ApiResult;
use crate::web::extract::{CurrentActor, JsonBody};
use crate::web::state::AppState;

// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    let actor = state
        .accounts
        .signup(&input.name, &input.email, &input.password)
        .await?;
    let token = state.sessions.issue(&actor)?;

    Ok((StatusCode::CREATED, Json(SessionResponse { token, actor })))
}

// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let actor = state.accounts.login(&input.email, &input.password).await?;
    let token = state.sessions.issue(&actor)?;
    tracing::info!(actor_id = %actor.id, role = %actor.role, "session issued");

    Ok(Json(SessionResponse { token, actor }))
}

// GET /auth/me
pub async fn me(CurrentActor(actor): CurrentActor) -> impl IntoResponse {
    Json(actor)
}
