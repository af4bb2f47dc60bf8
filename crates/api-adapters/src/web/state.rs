use std::sync::Arc;

use domains::SessionIssuer;
use services::{AccountService, ComplaintService, ReplyService};

use crate::metrics::Metrics;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: services hold their ports behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub complaints: ComplaintService,
    pub replies: ReplyService,
    pub accounts: AccountService,
    pub sessions: Arc<dyn SessionIssuer>,
    pub metrics: Arc<Metrics>,
}
