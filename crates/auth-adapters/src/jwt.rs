//! HS256 session tokens implementing `SessionIssuer`.
//!
//! The token carries the whole actor snapshot, so resolving a session needs
//! no store lookup. Role is part of the signed payload and cannot be altered
//! client-side.

use chrono::{Duration, Utc};
use domains::{Actor, DomainError, Result, Role, SessionIssuer};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    name: String,
    email: String,
    role: Role,
    iat: i64,
    exp: i64,
    /// Unique token identifier
    jti: String,
}

pub struct JwtSessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtSessionIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }
}

impl SessionIssuer for JwtSessionIssuer {
    fn issue(&self, actor: &Actor) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: actor.id,
            name: actor.name.clone(),
            email: actor.email.clone(),
            role: actor.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(DomainError::internal)
    }

    fn resolve(&self, token: &str) -> Result<Actor> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|err| {
                tracing::debug!(error = %err, "session token rejected");
                DomainError::Unauthorized("invalid or expired session".into())
            })?;

        let claims = data.claims;
        Ok(Actor {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Actor {
        Actor {
            id: Uuid::now_v7(),
            name: "Admin Smith".into(),
            email: "admin@university.edu".into(),
            role: Role::Admin,
        }
    }

    #[test]
    fn resolves_the_issued_actor() {
        let issuer = JwtSessionIssuer::new(b"test-secret", Duration::minutes(30));
        let actor = admin();
        let token = issuer.issue(&actor).unwrap();
        assert_eq!(issuer.resolve(&token).unwrap(), actor);
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let issuer = JwtSessionIssuer::new(b"test-secret", Duration::minutes(30));
        let forger = JwtSessionIssuer::new(b"other-secret", Duration::minutes(30));
        let token = forger.issue(&admin()).unwrap();
        assert!(matches!(
            issuer.resolve(&token),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn rejects_expired_tokens() {
        // Past the default 60s validation leeway.
        let issuer = JwtSessionIssuer::new(b"test-secret", Duration::minutes(-5));
        let token = issuer.issue(&admin()).unwrap();
        assert!(issuer.resolve(&token).is_err());
    }

    #[test]
    fn rejects_garbage() {
        let issuer = JwtSessionIssuer::new(b"test-secret", Duration::minutes(30));
        assert!(issuer.resolve("not.a.token").is_err());
    }
}
