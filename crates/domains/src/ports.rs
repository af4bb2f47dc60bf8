//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be used by the binary.
//! Repositories return [`crate::Result`]; adapters map their own failures into
//! [`DomainError::Internal`](crate::DomainError::Internal).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{
    Account, Actor, Complaint, ComplaintId, ComplaintStatus, NewComplaint, NewReply, Reply,
};

/// Persistence contract for complaints and their replies.
///
/// Each method is one atomic mutation or read. Implementations must serialize
/// mutations that touch the same complaint.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ComplaintRepo: Send + Sync {
    // Complaint Operations

    /// Assigns the next id in creation order and stores the complaint as `open`.
    async fn insert_complaint(&self, draft: NewComplaint) -> Result<Complaint>;
    async fn get_complaint(&self, id: ComplaintId) -> Result<Option<Complaint>>;
    /// All complaints in creation order.
    async fn list_complaints(&self) -> Result<Vec<Complaint>>;
    /// One student's complaints in creation order.
    async fn list_complaints_by_student(&self, student_id: Uuid) -> Result<Vec<Complaint>>;
    /// Sets the status and bumps `updated_at` to `at` (never below `created_at`).
    /// Returns `None` when the complaint does not exist.
    async fn update_status(
        &self,
        id: ComplaintId,
        status: ComplaintStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Complaint>>;
    /// Removes the complaint together with all of its replies.
    /// Returns `false` when the complaint does not exist.
    async fn delete_complaint(&self, id: ComplaintId) -> Result<bool>;

    // Reply Operations

    /// Stores the reply and bumps the parent's `updated_at` in one step.
    /// Returns `None` (and stores nothing) when the parent does not exist.
    async fn insert_reply(&self, draft: NewReply) -> Result<Option<Reply>>;
    /// Replies of one complaint in creation order.
    async fn list_replies(&self, complaint_id: ComplaintId) -> Result<Vec<Reply>>;
}

/// Persistence contract for identity provider accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AccountRepo: Send + Sync {
    /// Returns `false` without storing anything if the email is already taken.
    async fn insert_account(&self, account: Account) -> Result<bool>;
    /// `email` must already be normalized.
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>>;
    async fn find_actor(&self, id: Uuid) -> Result<Option<Actor>>;
}

/// Password hashing backend.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Produces a self-describing (PHC) hash string.
    async fn hash_password(&self, password: &str) -> Result<String>;
    /// Verifies if a provided password matches a stored hash.
    async fn verify_password(&self, password: &str, hash: &str) -> bool;
}

/// Issues and verifies session tokens carrying the actor.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionIssuer: Send + Sync {
    fn issue(&self, actor: &Actor) -> Result<String>;
    /// Fails with `Unauthorized` for malformed, forged or expired tokens.
    fn resolve(&self, token: &str) -> Result<Actor>;
}

/// Source of "now" for timestamps.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
