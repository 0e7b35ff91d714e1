use serde::{Deserialize, Serialize};

use crate::schema::User;

/// Client-facing representation of a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserView {
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub disabled: bool,
    pub admin_channels: Vec<String>,
    pub admin_roles: Vec<String>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            disabled: user.disabled,
            admin_channels: user.admin_channels,
            admin_roles: user.admin_roles,
        }
    }
}
