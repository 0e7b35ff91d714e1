//! Access rules shared by every user-facing operation.
//!
//! The predicates are pure. The `require_*` helpers turn them into
//! request failures and are always applied in the same order:
//! the caller is resolved (see [`crate::http::Caller`]), then
//! [`require_active`], then the operation specific privilege check.
//! A disabled superuser is therefore stopped before its role is
//! even looked at.
use thiserror::Error;

use crate::http::Error;
use crate::schema::User;
use crate::types;

/// Role granting unrestricted access to every user record.
pub const SUPERUSER_ROLE: &str = "superuser";

#[must_use]
pub fn is_active(user: &User) -> bool {
    !user.disabled
}

#[must_use]
pub fn is_superuser(user: &User) -> bool {
    user.admin_roles.iter().any(|role| role == SUPERUSER_ROLE)
}

#[must_use]
pub fn can_view(requester: &User, target: &User) -> bool {
    requester.username == target.username || is_superuser(requester)
}

#[derive(Debug, Error)]
#[error("caller {0:?} is disabled")]
struct InactiveCaller(String);

#[derive(Debug, Error)]
#[error("caller {0:?} is not a superuser")]
struct NotSuperuser(String);

pub fn require_active(user: &User) -> Result<(), Error> {
    if is_active(user) {
        Ok(())
    } else {
        Err(Error::from_context(
            types::Error::InactiveUser,
            InactiveCaller(user.username.clone()),
        ))
    }
}

pub fn require_superuser(user: &User) -> Result<(), Error> {
    if is_superuser(user) {
        Ok(())
    } else {
        Err(Error::from_context(
            types::Error::Forbidden,
            NotSuperuser(user.username.clone()),
        ))
    }
}
