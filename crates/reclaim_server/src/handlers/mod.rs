//! Request handlers, grouped by surface.

pub mod admin;
pub mod auth;
pub mod claims;
pub mod contact;
pub mod items;
pub mod uploads;
pub mod views;

use serde::Serialize;

use reclaim_db::User;

/// User shape returned to clients (no password hash, no timestamps).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
        }
    }
}
