pub mod auth;
pub mod complaints;
pub mod ops;
pub mod replies;

use domains::{policy, Actor, ComplaintId};

use crate::web::error::ApiResult;

/// Path id for an admin-only route. The role is checked before the id is
/// parsed, so a student gets 403 for any id, well-formed or not.
pub(crate) fn managed_complaint_id(actor: &Actor, raw: &str) -> ApiResult<ComplaintId> {
    policy::ensure_can_manage(actor)?;
    Ok(raw.parse::<ComplaintId>()?)
}
