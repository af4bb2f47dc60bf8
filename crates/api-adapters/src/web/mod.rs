//! # HTTP API (axum)
//!
//! Route hierarchy:
//!
//! ```text
//! /health                               liveness (public)
//! /metrics                              Prometheus exposition (public)
//!
//! /auth/signup                          create a student account (public)
//! /auth/login                           exchange credentials for a session (public)
//! /auth/me                              current actor
//!
//! /complaints                           submit (POST), list (GET, ?student_id=)
//! /complaints/stats                     status counts for the caller
//! /complaints/{id}                      get, delete
//! /complaints/{id}/status               change status (PATCH)
//! /complaints/{id}/replies              add (POST), list (GET)
//! ```

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use handlers::{auth, complaints, ops, replies};

pub use error::{ApiError, ApiResult};
pub use extract::{CurrentActor, JsonBody, QueryParams};
pub use state::AppState;

/// Bare routes bound to `state`, without middleware.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route(
            "/complaints",
            post(complaints::create).get(complaints::list),
        )
        .route("/complaints/stats", get(complaints::stats))
        .route(
            "/complaints/{id}",
            get(complaints::get).delete(complaints::delete),
        )
        .route("/complaints/{id}/status", patch(complaints::set_status))
        .route(
            "/complaints/{id}/replies",
            post(replies::add).get(replies::list),
        )
        .with_state(state)
}

/// Full application: routes plus request-id, tracing and CORS layers.
///
/// An empty `cors_origins` allows any origin.
pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    routes(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_policy(cors_origins))
}

fn cors_policy(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| tracing::warn!(%origin, "ignoring invalid CORS origin"))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(3600))
}
