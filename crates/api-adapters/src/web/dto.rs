//! Request and response bodies.
//!
//! Text fields default to empty so a missing field reaches domain validation
//! and is reported with its name.

use domains::Actor;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by signup and login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub actor: Actor,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateComplaintRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ListComplaintsParams {
    pub student_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateStatusRequest {
    /// Wire form, parsed by the handler so unknown values report `field`.
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateReplyRequest {
    pub message: String,
}
