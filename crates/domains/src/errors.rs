//! # DomainError
//!
//! Centralized error handling for the Complaint Desk ecosystem.
//! Every variant is a per-request outcome; none of them is fatal to the process.

use thiserror::Error;

/// The primary error type for all domain and port operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is missing or malformed, or a uniqueness rule failed
    /// (e.g. blank complaint title, email already registered).
    #[error("validation error on `{field}`: {message}")]
    Validation { field: &'static str, message: String },

    /// The actor's role or ownership does not permit the action.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (e.g., Complaint, Account)
    #[error("{entity} not found with ID {id}")]
    NotFound { entity: &'static str, id: String },

    /// Credentials or session token rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Infrastructure failure (e.g., DB down, hashing backend error)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A specialized Result type for Complaint Desk logic.
pub type Result<T> = std::result::Result<T, DomainError>;
