use tracing::warn;

use crate::error::{DeskError, DeskResult};
use crate::models::UserRole;
use crate::session::Session;

/// Single capability check used by every gated operation.
///
/// `action` is phrased as a verb ("verify a task") and ends up in the
/// user-facing notice.
pub fn requires(session: &Session, role: UserRole, action: &str) -> DeskResult<()> {
    let allowed = match role {
        UserRole::Admin => session.role() == UserRole::Admin,
        // every signed-in user holds at least staff rights
        UserRole::Staff => true,
    };
    if allowed {
        Ok(())
    } else {
        warn!(user = session.name(), action, "permission denied");
        Err(DeskError::PermissionDenied { action: action.to_string() })
    }
}
