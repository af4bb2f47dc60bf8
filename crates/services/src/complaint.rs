//! Complaint Store: submission, triage and removal of complaints.

use std::sync::Arc;

use domains::policy;
use domains::query::{self, StatusCounts};
use domains::{
    Actor, Clock, Complaint, ComplaintId, ComplaintRepo, ComplaintStatus, DomainError,
    NewComplaint, Result,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct ComplaintService {
    repo: Arc<dyn ComplaintRepo>,
    clock: Arc<dyn Clock>,
}

impl ComplaintService {
    pub fn new(repo: Arc<dyn ComplaintRepo>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Submits a new complaint on behalf of `student`. It starts `open` with
    /// `created_at == updated_at`.
    pub async fn create(
        &self,
        student: &Actor,
        title: &str,
        description: &str,
    ) -> Result<Complaint> {
        policy::ensure_can_create_complaint(student)?;
        let draft = NewComplaint::new(student, title, description, self.clock.now())?;
        let complaint = self.repo.insert_complaint(draft).await?;

        tracing::info!(
            complaint_id = %complaint.id,
            student_id = %student.id,
            "complaint submitted"
        );
        Ok(complaint)
    }

    pub async fn get_by_id(&self, actor: &Actor, id: ComplaintId) -> Result<Complaint> {
        let complaint = self.require(id).await?;
        policy::ensure_can_view(actor, &complaint)?;
        Ok(complaint)
    }

    /// A student may only list themself; admins may list anyone.
    pub async fn list_by_student(&self, actor: &Actor, student_id: Uuid) -> Result<Vec<Complaint>> {
        policy::ensure_can_list_student(actor, student_id)?;
        self.repo.list_complaints_by_student(student_id).await
    }

    pub async fn list_all(&self, actor: &Actor) -> Result<Vec<Complaint>> {
        policy::ensure_can_manage(actor)?;
        self.repo.list_complaints().await
    }

    /// Dashboard view: everything for admins, own complaints for students.
    pub async fn list_visible(&self, actor: &Actor) -> Result<Vec<Complaint>> {
        if actor.is_admin() {
            self.repo.list_complaints().await
        } else {
            self.repo.list_complaints_by_student(actor.id).await
        }
    }

    /// Tallies over the complaints `actor` can see.
    pub async fn status_counts(&self, actor: &Actor) -> Result<StatusCounts> {
        let visible = self.list_visible(actor).await?;
        Ok(query::status_counts(&visible))
    }

    /// Moves a complaint to `status`. `updated_at` advances even when the
    /// status is unchanged.
    pub async fn set_status(
        &self,
        actor: &Actor,
        id: ComplaintId,
        status: ComplaintStatus,
    ) -> Result<Complaint> {
        policy::ensure_can_manage(actor)?;
        let current = self.require(id).await?;
        policy::ensure_transition(current.status, status)?;

        let updated = self
            .repo
            .update_status(id, status, self.clock.now())
            .await?
            .ok_or_else(|| DomainError::not_found("Complaint", id))?;

        tracing::info!(
            complaint_id = %id,
            admin_id = %actor.id,
            from = %current.status,
            to = %status,
            "complaint status changed"
        );
        Ok(updated)
    }

    /// Deletes a complaint and every reply attached to it.
    pub async fn delete(&self, actor: &Actor, id: ComplaintId) -> Result<()> {
        policy::ensure_can_manage(actor)?;
        if !self.repo.delete_complaint(id).await? {
            return Err(DomainError::not_found("Complaint", id));
        }
        tracing::info!(complaint_id = %id, admin_id = %actor.id, "complaint deleted");
        Ok(())
    }

    async fn require(&self, id: ComplaintId) -> Result<Complaint> {
        self.repo
            .get_complaint(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Complaint", id))
    }
}
