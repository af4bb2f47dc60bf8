//! # Lifecycle Policy
//!
//! Pure authorization rules. Services call the `ensure_*` helpers before
//! touching a repository, so no mutation path skips them.

use crate::errors::{DomainError, Result};
use uuid::Uuid;

use crate::models::{Actor, Complaint, ComplaintStatus, Role};

/// Only students submit complaints.
pub fn can_create_complaint(actor: &Actor) -> bool {
    match actor.role {
        Role::Student => true,
        Role::Admin => false,
    }
}

/// Status changes, deletes and replies are admin-only.
pub fn can_manage(actor: &Actor) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Student => false,
    }
}

/// Admins see everything; students see only what they submitted.
pub fn can_view(actor: &Actor, complaint: &Complaint) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Student => complaint.is_owned_by(actor),
    }
}

/// Admins may list any student's complaints; a student only their own.
pub fn can_list_student(actor: &Actor, student_id: Uuid) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Student => actor.id == student_id,
    }
}

/// Every status is reachable from every other one and nothing is terminal;
/// a resolved complaint may be reopened.
pub fn is_transition_permitted(from: ComplaintStatus, to: ComplaintStatus) -> bool {
    use ComplaintStatus::*;
    match (from, to) {
        (Open, Open) | (Open, InProgress) | (Open, Resolved) => true,
        (InProgress, Open) | (InProgress, InProgress) | (InProgress, Resolved) => true,
        (Resolved, Open) | (Resolved, InProgress) | (Resolved, Resolved) => true,
    }
}

pub fn ensure_can_create_complaint(actor: &Actor) -> Result<()> {
    if can_create_complaint(actor) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(
            "only students can submit complaints".into(),
        ))
    }
}

pub fn ensure_can_manage(actor: &Actor) -> Result<()> {
    if can_manage(actor) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(
            "only administrators can manage complaints".into(),
        ))
    }
}

pub fn ensure_can_view(actor: &Actor, complaint: &Complaint) -> Result<()> {
    if can_view(actor, complaint) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "complaint {} belongs to another student",
            complaint.id
        )))
    }
}

pub fn ensure_can_list_student(actor: &Actor, student_id: Uuid) -> Result<()> {
    if can_list_student(actor, student_id) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(
            "students can only list their own complaints".into(),
        ))
    }
}

pub fn ensure_transition(from: ComplaintStatus, to: ComplaintStatus) -> Result<()> {
    if is_transition_permitted(from, to) {
        Ok(())
    } else {
        Err(DomainError::validation(
            "status",
            format!("cannot move a complaint from {from} to {to}"),
        ))
    }
}
