//! The acting user, passed explicitly into every gated operation.

use crate::error::{DeskError, DeskResult};
use crate::models::{new_id, UserInfo, UserRole};

/// Invite code a staff member must present when signing up.
pub const STAFF_INVITE_CODE: &str = "123456";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user: UserInfo,
}

impl Session {
    pub fn new(user: UserInfo) -> Session {
        Session { user }
    }

    /// Identity used when no record has been stored yet.
    pub fn fallback() -> Session {
        Session::new(UserInfo {
            id: "admin".into(),
            name: "관리자".into(),
            role: UserRole::Admin,
            pension_name: "오션뷰".into(),
        })
    }

    pub fn user(&self) -> &UserInfo {
        &self.user
    }

    pub fn name(&self) -> &str {
        &self.user.name
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == UserRole::Admin
    }
}

/// Builds a new identity record from the role picker.
///
/// There is no credential check. Staff sign-ups must carry the pension's
/// invite code; a blank name falls back to `홍길동`.
pub fn login(name: &str, role: UserRole, pension_name: &str, invite_code: Option<&str>) -> DeskResult<Session> {
    if role == UserRole::Staff && invite_code != Some(STAFF_INVITE_CODE) {
        return Err(DeskError::validation("invalid invite code, ask your administrator"));
    }
    if pension_name.trim().is_empty() {
        return Err(DeskError::validation("pension name must not be empty"));
    }
    let name = if name.trim().is_empty() { "홍길동" } else { name.trim() };
    Ok(Session::new(UserInfo {
        id: new_id(),
        name: name.to_string(),
        role,
        pension_name: pension_name.trim().to_string(),
    }))
}
