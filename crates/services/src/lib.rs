//! # services
//!
//! Use-cases of Complaint Desk. Each service owns `Arc`s of the ports it needs,
//! runs the lifecycle policy before any repository call and validates input
//! before any mutation.

pub mod account;
pub mod complaint;
pub mod reply;
pub mod seed;

pub use account::AccountService;
pub use complaint::ComplaintService;
pub use reply::ReplyService;
