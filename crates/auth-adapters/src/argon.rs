//! Argon2-based implementation of `CredentialHasher`.
//!
//! Hashes are PHC strings, so algorithm parameters and salt travel with the
//! hash. Hashing and verification run on the blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use domains::{CredentialHasher, DomainError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
        })
        .await
        .map_err(DomainError::internal)?
        .map_err(DomainError::internal)
    }

    /// Verifies if a provided password matches a stored Argon2 hash.
    /// A malformed stored hash counts as a mismatch.
    async fn verify_password(&self, password: &str, hash: &str) -> bool {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let verdict = tokio::task::spawn_blocking(move || {
            let parsed_hash = match PasswordHash::new(&hash) {
                Ok(p) => p,
                Err(err) => {
                    tracing::warn!(error = %err, "stored password hash is malformed");
                    return false;
                }
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .await;

        verdict.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash_password("secret1").await.unwrap();

        assert!(hash.starts_with("$argon2id$"), "expected argon2id PHC prefix");
        assert!(hasher.verify_password("secret1", &hash).await);
        assert!(!hasher.verify_password("secret2", &hash).await);
    }

    #[tokio::test]
    async fn test_salts_differ() {
        let hasher = Argon2Hasher::new();
        let a = hasher.hash_password("same-password").await.unwrap();
        let b = hasher.hash_password("same-password").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_malformed_hash_never_verifies() {
        let hasher = Argon2Hasher::new();
        assert!(!hasher.verify_password("anything", "not-a-phc-string").await);
    }
}
