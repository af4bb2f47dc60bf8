//! Identity provider facade: signup, login and actor lookup.
//!
//! Self-service signup always yields a student. Admin accounts are created by
//! the operator through [`AccountService::register_admin`].

use std::sync::Arc;

use domains::{
    normalize_email, required, Account, AccountRepo, Actor, Clock, CredentialHasher, DomainError,
    Result, Role, MIN_PASSWORD_LEN,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepo>,
    hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountRepo>,
        hasher: Arc<dyn CredentialHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            clock,
        }
    }

    /// Creates a student account. Fails with a validation error on `email`
    /// if the address is already registered; nothing is stored in that case.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Actor> {
        let actor = self.register(name, email, password, Role::Student).await?;
        tracing::info!(actor_id = %actor.id, "student signed up");
        Ok(actor)
    }

    pub async fn register_admin(&self, name: &str, email: &str, password: &str) -> Result<Actor> {
        let actor = self.register(name, email, password, Role::Admin).await?;
        tracing::info!(actor_id = %actor.id, "admin account registered");
        Ok(actor)
    }

    /// Resolves credentials to an actor. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<Actor> {
        let rejected = || DomainError::Unauthorized("invalid email or password".into());

        if password.is_empty() {
            return Err(rejected());
        }
        let account = self
            .accounts
            .find_account_by_email(&normalize_email(email))
            .await?
            .ok_or_else(rejected)?;

        if !self
            .hasher
            .verify_password(password, &account.password_hash)
            .await
        {
            tracing::warn!(actor_id = %account.actor.id, "login rejected");
            return Err(rejected());
        }
        Ok(account.actor)
    }

    pub async fn find_actor(&self, id: Uuid) -> Result<Actor> {
        self.accounts
            .find_actor(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Account", id))
    }

    async fn register(&self, name: &str, email: &str, password: &str, role: Role) -> Result<Actor> {
        let name = required("name", name)?;
        let email = normalize_email(&required("email", email)?);
        if !email.contains('@') {
            return Err(DomainError::validation("email", "must be an email address"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if self.accounts.find_account_by_email(&email).await?.is_some() {
            return Err(email_taken());
        }

        let account = Account {
            actor: Actor {
                id: Uuid::now_v7(),
                name,
                email,
                role,
            },
            password_hash: self.hasher.hash_password(password).await?,
            created_at: self.clock.now(),
        };
        let actor = account.actor.clone();

        // The repo re-checks uniqueness atomically; two concurrent signups
        // can both pass the lookup above.
        if !self.accounts.insert_account(account).await? {
            return Err(email_taken());
        }
        Ok(actor)
    }
}

fn email_taken() -> DomainError {
    DomainError::validation("email", "email exists")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::{MockAccountRepo, MockClock, MockCredentialHasher};

    fn clock() -> Arc<MockClock> {
        let mut clock = MockClock::new();
        clock.expect_now().returning(Utc::now);
        Arc::new(clock)
    }

    fn plain_hasher() -> MockCredentialHasher {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash_password()
            .returning(|p| Ok(format!("hashed:{p}")));
        hasher
            .expect_verify_password()
            .returning(|p, h| h == format!("hashed:{p}"));
        hasher
    }

    fn existing(email: &str) -> Account {
        Account {
            actor: Actor {
                id: Uuid::now_v7(),
                name: "Jane Student".into(),
                email: email.into(),
                role: Role::Student,
            },
            password_hash: "hashed:secret1".into(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn signup_creates_a_student() {
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account_by_email().returning(|_| Ok(None));
        repo.expect_insert_account()
            .withf(|account| {
                account.actor.email == "new@university.edu"
                    && account.password_hash == "hashed:secret1"
            })
            .times(1)
            .returning(|_| Ok(true));

        let svc = AccountService::new(Arc::new(repo), Arc::new(plain_hasher()), clock());
        let actor = svc
            .signup("New Student", " New@University.edu ", "secret1")
            .await
            .unwrap();
        assert_eq!(actor.role, Role::Student);
        assert_eq!(actor.email, "new@university.edu");
    }

    #[tokio::test]
    async fn duplicate_email_does_not_insert() {
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account_by_email()
            .returning(|email| Ok(Some(existing(email))));
        repo.expect_insert_account().never();

        let svc = AccountService::new(Arc::new(repo), Arc::new(plain_hasher()), clock());
        let err = svc
            .signup("Jane", "jane@university.edu", "secret1")
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::validation("email", "email exists"));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account_by_email().never();
        repo.expect_insert_account().never();

        let svc = AccountService::new(Arc::new(repo), Arc::new(plain_hasher()), clock());
        let err = svc
            .signup("Jane", "jane@university.edu", "12345")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "password", .. }));
    }

    #[tokio::test]
    async fn login_checks_the_password() {
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account_by_email()
            .returning(|email| Ok(Some(existing(email))));

        let svc = AccountService::new(Arc::new(repo), Arc::new(plain_hasher()), clock());
        let actor = svc.login("JANE@university.edu", "secret1").await.unwrap();
        assert_eq!(actor.email, "jane@university.edu");

        let err = svc
            .login("jane@university.edu", "wrong-one")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_unauthorized() {
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account_by_email().returning(|_| Ok(None));

        let svc = AccountService::new(Arc::new(repo), Arc::new(plain_hasher()), clock());
        let err = svc.login("ghost@university.edu", "secret1").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }
}
