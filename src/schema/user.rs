use sqlx::FromRow;

use crate::util::Sensitive;

/// A persisted user record.
///
/// This type never goes over the wire as is; handlers convert it
/// into [`UserView`](crate::types::UserView) which has no password
/// field at all.
#[derive(Clone, FromRow, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub disabled: bool,
    pub admin_channels: Vec<String>,
    pub admin_roles: Vec<String>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("disabled", &self.disabled)
            .field("admin_roles", &self.admin_roles)
            .finish_non_exhaustive()
    }
}

/// A complete record to be inserted. The password must already
/// be hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: Sensitive<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub disabled: bool,
    pub admin_channels: Vec<String>,
    pub admin_roles: Vec<String>,
}

impl NewUser {
    #[must_use]
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: Sensitive::new(password_hash.into()),
            email: None,
            full_name: None,
            disabled: false,
            admin_channels: Vec::new(),
            admin_roles: Vec::new(),
        }
    }

    #[must_use]
    pub fn into_user(self) -> User {
        User {
            username: self.username,
            password_hash: self.password_hash.into_inner(),
            email: self.email,
            full_name: self.full_name,
            disabled: self.disabled,
            admin_channels: self.admin_channels,
            admin_roles: self.admin_roles,
        }
    }
}

/// Partial update of a user record. Fields left as `None`
/// keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub password_hash: Option<Sensitive<String>>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub disabled: Option<bool>,
    pub admin_channels: Option<Vec<String>>,
    pub admin_roles: Option<Vec<String>>,
}

impl UserChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the supplied fields on top of an existing record.
    pub fn apply(&self, user: &mut User) {
        if let Some(hash) = self.password_hash.as_ref() {
            user.password_hash = hash.value().clone();
        }
        if let Some(email) = self.email.as_ref() {
            user.email = Some(email.clone());
        }
        if let Some(full_name) = self.full_name.as_ref() {
            user.full_name = Some(full_name.clone());
        }
        if let Some(disabled) = self.disabled {
            user.disabled = disabled;
        }
        if let Some(channels) = self.admin_channels.as_ref() {
            user.admin_channels = channels.clone();
        }
        if let Some(roles) = self.admin_roles.as_ref() {
            user.admin_roles = roles.clone();
        }
    }
}
