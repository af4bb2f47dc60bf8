//! # Domain Models
//!
//! These structs represent the core entities of Complaint Desk.
//! Complaint and reply ids come from a per-store sequence so they follow
//! creation order; actor ids are UUID v7.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, Result};

/// Minimum accepted password length at signup.
pub const MIN_PASSWORD_LEN: usize = 6;

// ─── Roles & status ──────────────────────────────────────────────────────────

/// Authorization role of an actor. Fixed when the account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::validation(
                "role",
                format!("unknown role `{other}`"),
            )),
        }
    }
}

/// Where a complaint sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 3] = [
        ComplaintStatus::Open,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
    ];

    /// Wire/storage form.
    pub fn as_str(self) -> &'static str {
        match self {
            ComplaintStatus::Open => "open",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved => "resolved",
        }
    }

    /// Human-readable form shown on status badges.
    pub fn label(self) -> &'static str {
        match self {
            ComplaintStatus::Open => "Open",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "open" => Ok(ComplaintStatus::Open),
            "in_progress" => Ok(ComplaintStatus::InProgress),
            "resolved" => Ok(ComplaintStatus::Resolved),
            other => Err(DomainError::validation(
                "status",
                format!("unknown status `{other}`"),
            )),
        }
    }
}

// ─── Identifiers ─────────────────────────────────────────────────────────────

macro_rules! sequence_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        /// Zero-padded code form, e.g. `C001`.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{:03}"), self.0)
            }
        }

        /// Accepts either the code form (`C001`) or the bare sequence number (`1`).
        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self> {
                let digits = s.strip_prefix($prefix).unwrap_or(s);
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(DomainError::not_found($entity, s));
                }
                digits
                    .parse::<i64>()
                    .ok()
                    .filter(|n| *n > 0)
                    .map($name)
                    .ok_or_else(|| DomainError::not_found($entity, s))
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.to_string()
            }
        }
    };
}

sequence_id!(
    /// Store-assigned complaint identifier.
    ComplaintId,
    "C",
    "Complaint"
);

sequence_id!(
    /// Store-assigned reply identifier.
    ReplyId,
    "R",
    "Reply"
);

// ─── Actors ──────────────────────────────────────────────────────────────────

/// The authenticated party performing an action, as resolved by the identity
/// provider. The core only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Identity provider record: an actor plus its credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub actor: Actor,
    /// PHC-formatted password hash
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Lowercased, trimmed email used as the uniqueness key for accounts.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ─── Complaints ──────────────────────────────────────────────────────────────

/// A complaint submitted by a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: ComplaintId,
    /// Snapshot of the submitting student, never updated afterwards
    pub student_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub title: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    /// Bumped by every status change and every reply
    pub updated_at: DateTime<Utc>,
}

impl Complaint {
    pub fn is_owned_by(&self, actor: &Actor) -> bool {
        self.student_id == actor.id
    }
}

/// A validated complaint waiting for the store to assign its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComplaint {
    pub student_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl NewComplaint {
    /// Validates the free-text fields and snapshots the student.
    pub fn new(
        student: &Actor,
        title: &str,
        description: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let title = required("title", title)?;
        let description = required("description", description)?;
        Ok(Self {
            student_id: student.id,
            student_name: student.name.clone(),
            student_email: student.email.clone(),
            title,
            description,
            created_at,
        })
    }

    /// Materializes the record once the store has picked an id.
    pub fn into_complaint(self, id: ComplaintId) -> Complaint {
        Complaint {
            id,
            student_id: self.student_id,
            student_name: self.student_name,
            student_email: self.student_email,
            title: self.title,
            description: self.description,
            status: ComplaintStatus::Open,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

// ─── Replies ─────────────────────────────────────────────────────────────────

/// An admin response attached to a complaint. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: ReplyId,
    pub complaint_id: ComplaintId,
    pub admin_id: Uuid,
    pub admin_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReply {
    pub complaint_id: ComplaintId,
    pub admin_id: Uuid,
    pub admin_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl NewReply {
    pub fn new(
        complaint_id: ComplaintId,
        admin: &Actor,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            complaint_id,
            admin_id: admin.id,
            admin_name: admin.name.clone(),
            message: required("message", message)?,
            created_at,
        })
    }

    pub fn into_reply(self, id: ReplyId) -> Reply {
        Reply {
            id,
            complaint_id: self.complaint_id,
            admin_id: self.admin_id,
            admin_name: self.admin_name,
            message: self.message,
            created_at: self.created_at,
        }
    }
}

/// Trims `value` and rejects it if nothing is left.
pub fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}
