//! # auth-adapters
//!
//! Identity provider plumbing behind the `domains` ports:
//! Argon2id credential hashing, and HS256 session tokens (feature `auth-jwt`).

pub mod argon;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use argon::Argon2Hasher;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtSessionIssuer;
