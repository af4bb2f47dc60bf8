//! # In-memory store
//!
//! Complaints and replies share one `RwLock` so that reply insertion with its
//! parent touch, and delete with its reply cascade, are single critical
//! sections. Accounts live in a `DashMap` keyed by normalized email.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{
    Account, AccountRepo, Actor, Complaint, ComplaintId, ComplaintRepo, ComplaintStatus,
    NewComplaint, NewReply, Reply, ReplyId, Result,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    // BTreeMap keyed by sequence id iterates in creation order
    complaints: BTreeMap<ComplaintId, Complaint>,
    replies: BTreeMap<ReplyId, Reply>,
    last_complaint_id: i64,
    last_reply_id: i64,
}

impl Tables {
    fn touch(complaint: &mut Complaint, at: DateTime<Utc>) {
        complaint.updated_at = at.max(complaint.created_at);
    }
}

#[derive(Default)]
pub struct InMemoryComplaintRepo {
    tables: RwLock<Tables>,
}

impl InMemoryComplaintRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ComplaintRepo for InMemoryComplaintRepo {
    async fn insert_complaint(&self, draft: NewComplaint) -> Result<Complaint> {
        let mut tables = self.tables.write().await;
        tables.last_complaint_id += 1;
        let complaint = draft.into_complaint(ComplaintId(tables.last_complaint_id));
        tables.complaints.insert(complaint.id, complaint.clone());
        Ok(complaint)
    }

    async fn get_complaint(&self, id: ComplaintId) -> Result<Option<Complaint>> {
        Ok(self.tables.read().await.complaints.get(&id).cloned())
    }

    async fn list_complaints(&self) -> Result<Vec<Complaint>> {
        Ok(self.tables.read().await.complaints.values().cloned().collect())
    }

    async fn list_complaints_by_student(&self, student_id: Uuid) -> Result<Vec<Complaint>> {
        Ok(self
            .tables
            .read()
            .await
            .complaints
            .values()
            .filter(|c| c.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: ComplaintId,
        status: ComplaintStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Complaint>> {
        let mut tables = self.tables.write().await;
        Ok(tables.complaints.get_mut(&id).map(|complaint| {
            complaint.status = status;
            Tables::touch(complaint, at);
            complaint.clone()
        }))
    }

    async fn delete_complaint(&self, id: ComplaintId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.complaints.remove(&id).is_none() {
            return Ok(false);
        }
        let before = tables.replies.len();
        tables.replies.retain(|_, reply| reply.complaint_id != id);
        tracing::debug!(
            complaint_id = %id,
            replies_removed = before - tables.replies.len(),
            "complaint removed"
        );
        Ok(true)
    }

    async fn insert_reply(&self, draft: NewReply) -> Result<Option<Reply>> {
        let mut tables = self.tables.write().await;
        let Some(parent) = tables.complaints.get_mut(&draft.complaint_id) else {
            return Ok(None);
        };
        Tables::touch(parent, draft.created_at);

        tables.last_reply_id += 1;
        let reply = draft.into_reply(ReplyId(tables.last_reply_id));
        tables.replies.insert(reply.id, reply.clone());
        Ok(Some(reply))
    }

    async fn list_replies(&self, complaint_id: ComplaintId) -> Result<Vec<Reply>> {
        Ok(self
            .tables
            .read()
            .await
            .replies
            .values()
            .filter(|r| r.complaint_id == complaint_id)
            .cloned()
            .collect())
    }
}

/// Accounts indexed by normalized email, with a secondary id → email index.
#[derive(Default)]
pub struct InMemoryAccountRepo {
    by_email: DashMap<String, Account>,
    email_by_id: DashMap<Uuid, String>,
}

impl InMemoryAccountRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

#[async_trait]
impl AccountRepo for InMemoryAccountRepo {
    async fn insert_account(&self, account: Account) -> Result<bool> {
        match self.by_email.entry(account.actor.email.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                self.email_by_id
                    .insert(account.actor.id, account.actor.email.clone());
                slot.insert(account);
                Ok(true)
            }
        }
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self.by_email.get(email).map(|entry| entry.value().clone()))
    }

    async fn find_actor(&self, id: Uuid) -> Result<Option<Actor>> {
        // Release the index guard before touching the primary map.
        let Some(email) = self.email_by_id.get(&id).map(|e| e.value().clone()) else {
            return Ok(None);
        };
        Ok(self.by_email.get(&email).map(|entry| entry.actor.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use domains::Role;

    fn t(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn actor(role: Role, name: &str) -> Actor {
        Actor {
            id: Uuid::now_v7(),
            name: name.into(),
            email: format!("{}@university.edu", name.to_lowercase()),
            role,
        }
    }

    async fn submit(repo: &InMemoryComplaintRepo, student: &Actor, title: &str) -> Complaint {
        let draft = NewComplaint::new(student, title, "details", t(0)).unwrap();
        repo.insert_complaint(draft).await.unwrap()
    }

    #[tokio::test]
    async fn ids_follow_creation_order_and_are_not_reused() {
        let repo = InMemoryComplaintRepo::new();
        let john = actor(Role::Student, "john");

        let first = submit(&repo, &john, "one").await;
        let second = submit(&repo, &john, "two").await;
        assert_eq!(first.id, ComplaintId(1));
        assert_eq!(second.id, ComplaintId(2));

        assert!(repo.delete_complaint(second.id).await.unwrap());
        let third = submit(&repo, &john, "three").await;
        assert_eq!(third.id, ComplaintId(3));
    }

    #[tokio::test]
    async fn listing_by_student_keeps_creation_order() {
        let repo = InMemoryComplaintRepo::new();
        let john = actor(Role::Student, "john");
        let jane = actor(Role::Student, "jane");

        submit(&repo, &john, "a").await;
        submit(&repo, &jane, "b").await;
        submit(&repo, &john, "c").await;

        let titles: Vec<_> = repo
            .list_complaints_by_student(john.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, ["a", "c"]);
        assert_eq!(repo.list_complaints().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_status_never_moves_updated_at_before_creation() {
        let repo = InMemoryComplaintRepo::new();
        let john = actor(Role::Student, "john");
        let complaint = submit(&repo, &john, "a").await;

        let updated = repo
            .update_status(complaint.id, ComplaintStatus::Resolved, t(-30))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ComplaintStatus::Resolved);
        assert_eq!(updated.updated_at, updated.created_at);

        assert!(repo
            .update_status(ComplaintId(99), ComplaintStatus::Open, t(1))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn reply_touches_parent_and_orphans_are_refused() {
        let repo = InMemoryComplaintRepo::new();
        let john = actor(Role::Student, "john");
        let admin = actor(Role::Admin, "admin");
        let complaint = submit(&repo, &john, "a").await;

        let draft = NewReply::new(complaint.id, &admin, "on it", t(5)).unwrap();
        let reply = repo.insert_reply(draft).await.unwrap().unwrap();
        assert_eq!(reply.id, ReplyId(1));
        let parent = repo.get_complaint(complaint.id).await.unwrap().unwrap();
        assert_eq!(parent.updated_at, t(5));

        let orphan = NewReply::new(ComplaintId(42), &admin, "hello?", t(6)).unwrap();
        assert!(repo.insert_reply(orphan).await.unwrap().is_none());
        assert_eq!(repo.list_replies(ComplaintId(42)).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn delete_cascades_to_replies() {
        let repo = InMemoryComplaintRepo::new();
        let john = actor(Role::Student, "john");
        let admin = actor(Role::Admin, "admin");
        let doomed = submit(&repo, &john, "doomed").await;
        let kept = submit(&repo, &john, "kept").await;

        for (id, msg) in [(doomed.id, "first"), (kept.id, "other"), (doomed.id, "second")] {
            let draft = NewReply::new(id, &admin, msg, t(1)).unwrap();
            repo.insert_reply(draft).await.unwrap().unwrap();
        }

        assert!(repo.delete_complaint(doomed.id).await.unwrap());
        assert!(repo.get_complaint(doomed.id).await.unwrap().is_none());
        assert!(repo.list_replies(doomed.id).await.unwrap().is_empty());
        assert_eq!(repo.list_replies(kept.id).await.unwrap().len(), 1);
        assert!(!repo.delete_complaint(doomed.id).await.unwrap());
    }

    #[tokio::test]
    async fn replies_list_in_insertion_order() {
        let repo = InMemoryComplaintRepo::new();
        let john = actor(Role::Student, "john");
        let admin = actor(Role::Admin, "admin");
        let complaint = submit(&repo, &john, "a").await;

        for msg in ["first", "second", "third"] {
            let draft = NewReply::new(complaint.id, &admin, msg, t(1)).unwrap();
            repo.insert_reply(draft).await.unwrap();
        }
        let messages: Vec<_> = repo
            .list_replies(complaint.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.message)
            .collect();
        assert_eq!(messages, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn account_emails_are_unique() {
        let repo = InMemoryAccountRepo::new();
        let jane = actor(Role::Student, "jane");
        let account = Account {
            actor: jane.clone(),
            password_hash: "hash".into(),
            created_at: t(0),
        };
        assert!(repo.insert_account(account.clone()).await.unwrap());

        let mut impostor = account;
        impostor.actor.id = Uuid::now_v7();
        assert!(!repo.insert_account(impostor.clone()).await.unwrap());
        assert_eq!(repo.len(), 1);
        assert!(repo.find_actor(impostor.actor.id).await.unwrap().is_none());

        assert_eq!(repo.find_actor(jane.id).await.unwrap(), Some(jane.clone()));
        let found = repo
            .find_account_by_email(&jane.email)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.actor.id, jane.id);
    }
}
