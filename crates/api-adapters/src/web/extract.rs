//! Request extractors: the session-token actor, and JSON/query wrappers
//! whose rejections render as [`ApiError`] bodies.

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use domains::{Actor, DomainError};

use super::error::ApiError;
use super::state::AppState;

/// The actor behind the `Authorization: Bearer <token>` header.
///
/// Any handler that takes this parameter rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| DomainError::Unauthorized("missing Authorization header".into()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            DomainError::Unauthorized("expected `Authorization: Bearer <token>`".into())
        })?;

        Ok(CurrentActor(state.sessions.resolve(token.trim())?))
    }
}

/// `axum::Json` with rejections routed through [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Query` with rejections routed through [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);
