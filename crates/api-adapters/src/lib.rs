//! # api-adapters
//!
//! The outer surfaces of Complaint Desk: Prometheus metrics (always compiled)
//! and the axum HTTP API (feature `web-axum`).

pub mod metrics;

#[cfg(feature = "web-axum")]
pub mod web;

pub use metrics::Metrics;
