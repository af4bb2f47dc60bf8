//! # storage-adapters
//!
//! Implementations of the `domains` repository ports.
//!
//! - [`memory`]: process-local store, always compiled. Used by tests and by
//!   the binary when no database is configured.
//! - `postgres` (feature `db-postgres`): sqlx-backed store with versioned
//!   migrations.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::{InMemoryAccountRepo, InMemoryComplaintRepo};
