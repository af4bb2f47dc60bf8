//! Reply Store: admin responses attached to complaints.

use std::sync::Arc;

use domains::policy;
use domains::{Actor, Clock, ComplaintId, ComplaintRepo, DomainError, NewReply, Reply, Result};

#[derive(Clone)]
pub struct ReplyService {
    repo: Arc<dyn ComplaintRepo>,
    clock: Arc<dyn Clock>,
}

impl ReplyService {
    pub fn new(repo: Arc<dyn ComplaintRepo>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Appends an admin reply and bumps the parent complaint's `updated_at`.
    /// A rejected reply leaves the parent untouched.
    pub async fn add(
        &self,
        admin: &Actor,
        complaint_id: ComplaintId,
        message: &str,
    ) -> Result<Reply> {
        policy::ensure_can_manage(admin)?;
        let draft = NewReply::new(complaint_id, admin, message, self.clock.now())?;

        let reply = self
            .repo
            .insert_reply(draft)
            .await?
            .ok_or_else(|| DomainError::not_found("Complaint", complaint_id))?;

        tracing::info!(
            reply_id = %reply.id,
            complaint_id = %complaint_id,
            admin_id = %admin.id,
            "reply added"
        );
        Ok(reply)
    }

    /// Replies in the order they were written.
    pub async fn list_by_complaint(
        &self,
        actor: &Actor,
        complaint_id: ComplaintId,
    ) -> Result<Vec<Reply>> {
        let complaint = self
            .repo
            .get_complaint(complaint_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Complaint", complaint_id))?;
        policy::ensure_can_view(actor, &complaint)?;
        self.repo.list_replies(complaint_id).await
    }
}
