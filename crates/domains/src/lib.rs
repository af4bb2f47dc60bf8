//! complaint-desk/crates/domains/src/lib.rs
//!
//! The central domain logic and interface definitions for Complaint Desk.
//! Nothing in this crate performs I/O; adapters implement the ports in
//! [`ports`] and services orchestrate them.

pub mod errors;
pub mod models;
pub mod policy;
pub mod ports;
pub mod query;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use ports::*;
