//! # PostgreSQL store
//!
//! Maps the relational model onto `domains` models. Multi-statement mutations
//! run in a transaction; reply insertion locks the parent row so concurrent
//! edits of one complaint serialize.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    Account, AccountRepo, Actor, Complaint, ComplaintId, ComplaintRepo, ComplaintStatus,
    DomainError, NewComplaint, NewReply, Reply, ReplyId, Result,
};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

const COMPLAINT_COLUMNS: &str = "id, student_id, student_name, student_email, title, \
                                 description, status, created_at, updated_at";

/// Opens a connection pool.
pub async fn connect(url: &str, max_connections: u32) -> std::result::Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

/// Applies the versioned schema in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

fn db_err(err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, "database error");
    DomainError::internal(err)
}

fn complaint_from_row(row: &PgRow) -> Result<Complaint> {
    let status: String = row.try_get("status").map_err(db_err)?;
    Ok(Complaint {
        id: ComplaintId(row.try_get("id").map_err(db_err)?),
        student_id: row.try_get("student_id").map_err(db_err)?,
        student_name: row.try_get("student_name").map_err(db_err)?,
        student_email: row.try_get("student_email").map_err(db_err)?,
        title: row.try_get("title").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        status: status.parse()?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

fn reply_from_row(row: &PgRow) -> Result<Reply> {
    Ok(Reply {
        id: ReplyId(row.try_get("id").map_err(db_err)?),
        complaint_id: ComplaintId(row.try_get("complaint_id").map_err(db_err)?),
        admin_id: row.try_get("admin_id").map_err(db_err)?,
        admin_name: row.try_get("admin_name").map_err(db_err)?,
        message: row.try_get("message").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

fn account_from_row(row: &PgRow) -> Result<Account> {
    let role: String = row.try_get("role").map_err(db_err)?;
    Ok(Account {
        actor: Actor {
            id: row.try_get("id").map_err(db_err)?,
            name: row.try_get("name").map_err(db_err)?,
            email: row.try_get("email").map_err(db_err)?,
            role: role.parse()?,
        },
        password_hash: row.try_get("password_hash").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

pub struct PgComplaintRepo {
    pool: PgPool,
}

impl PgComplaintRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComplaintRepo for PgComplaintRepo {
    async fn insert_complaint(&self, draft: NewComplaint) -> Result<Complaint> {
        let row = sqlx::query(&format!(
            "INSERT INTO complaints \
             (student_id, student_name, student_email, title, description, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, 'open', $6, $6) \
             RETURNING {COMPLAINT_COLUMNS}"
        ))
        .bind(draft.student_id)
        .bind(&draft.student_name)
        .bind(&draft.student_email)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        complaint_from_row(&row)
    }

    async fn get_complaint(&self, id: ComplaintId) -> Result<Option<Complaint>> {
        let row = sqlx::query(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(complaint_from_row).transpose()
    }

    async fn list_complaints(&self) -> Result<Vec<Complaint>> {
        sqlx::query(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?
        .iter()
        .map(complaint_from_row)
        .collect()
    }

    async fn list_complaints_by_student(&self, student_id: Uuid) -> Result<Vec<Complaint>> {
        sqlx::query(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE student_id = $1 ORDER BY id ASC"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?
        .iter()
        .map(complaint_from_row)
        .collect()
    }

    async fn update_status(
        &self,
        id: ComplaintId,
        status: ComplaintStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Complaint>> {
        let row = sqlx::query(&format!(
            "UPDATE complaints SET status = $2, updated_at = GREATEST($3, created_at) \
             WHERE id = $1 RETURNING {COMPLAINT_COLUMNS}"
        ))
        .bind(id.get())
        .bind(status.as_str())
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(complaint_from_row).transpose()
    }

    /// The foreign key cascades as well; the explicit delete keeps the
    /// behaviour independent of the constraint definition.
    async fn delete_complaint(&self, id: ComplaintId) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("DELETE FROM complaint_replies WHERE complaint_id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        let removed = sqlx::query("DELETE FROM complaints WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?
            .rows_affected();

        tx.commit().await.map_err(db_err)?;
        Ok(removed == 1)
    }

    async fn insert_reply(&self, draft: NewReply) -> Result<Option<Reply>> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // 1. Lock the parent so status edits and replies on it serialize
        let parent = sqlx::query("SELECT id FROM complaints WHERE id = $1 FOR UPDATE")
            .bind(draft.complaint_id.get())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?;
        if parent.is_none() {
            tx.rollback().await.map_err(db_err)?;
            return Ok(None);
        }

        // 2. Insert the reply
        let row = sqlx::query(
            "INSERT INTO complaint_replies (complaint_id, admin_id, admin_name, message, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, complaint_id, admin_id, admin_name, message, created_at",
        )
        .bind(draft.complaint_id.get())
        .bind(draft.admin_id)
        .bind(&draft.admin_name)
        .bind(&draft.message)
        .bind(draft.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        // 3. Touch the parent
        sqlx::query("UPDATE complaints SET updated_at = GREATEST($2, created_at) WHERE id = $1")
            .bind(draft.complaint_id.get())
            .bind(draft.created_at)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        reply_from_row(&row).map(Some)
    }

    async fn list_replies(&self, complaint_id: ComplaintId) -> Result<Vec<Reply>> {
        sqlx::query(
            "SELECT id, complaint_id, admin_id, admin_name, message, created_at \
             FROM complaint_replies WHERE complaint_id = $1 ORDER BY id ASC",
        )
        .bind(complaint_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?
        .iter()
        .map(reply_from_row)
        .collect()
    }
}

pub struct PgAccountRepo {
    pool: PgPool,
}

impl PgAccountRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepo for PgAccountRepo {
    async fn insert_account(&self, account: Account) -> Result<bool> {
        let inserted = sqlx::query(
            "INSERT INTO accounts (id, name, email, role, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT (email) DO NOTHING",
        )
        .bind(account.actor.id)
        .bind(&account.actor.name)
        .bind(&account.actor.email)
        .bind(account.actor.role.as_str())
        .bind(&account.password_hash)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?
        .rows_affected();

        Ok(inserted == 1)
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let row = sqlx::query(
            "SELECT id, name, email, role, password_hash, created_at FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn find_actor(&self, id: Uuid) -> Result<Option<Actor>> {
        let row = sqlx::query(
            "SELECT id, name, email, role, password_hash, created_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row
            .as_ref()
            .map(account_from_row)
            .transpose()?
            .map(|account| account.actor))
    }
}
