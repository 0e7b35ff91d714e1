use serde::ser::SerializeMap;
use serde::Serialize;

use crate::validate::ValidateError;

/// Public error kinds: what a client is allowed to learn about
/// a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The bearer token is missing, malformed, expired or points
    /// to a user that no longer exists.
    Unauthenticated,
    InactiveUser,
    /// The caller is active but lacks the role for the operation.
    Forbidden,
    RegistrationClosed,
    UserExists,
    UserNotFound,
    IncorrectCredentials,
    InvalidFormBody(ValidateError),
    Internal,
}

impl Error {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::InactiveUser => "inactive_user",
            Self::Forbidden => "forbidden",
            Self::RegistrationClosed => "registration_closed",
            Self::UserExists => "user_exists",
            Self::UserNotFound => "user_not_found",
            Self::IncorrectCredentials => "incorrect_credentials",
            Self::InvalidFormBody(..) => "invalid_form_body",
            Self::Internal => "internal",
        }
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "Could not authenticate user with provided token",
            Self::InactiveUser => "Inactive user",
            Self::Forbidden => "The user doesn't have enough privileges",
            Self::RegistrationClosed => "Open user registration is forbidden on this server",
            Self::UserExists => "The user with this username already exists in the system",
            Self::UserNotFound => "The user with this username does not exist in the system",
            Self::IncorrectCredentials => "Incorrect username or password",
            Self::InvalidFormBody(..) => "Invalid form body",
            Self::Internal => "Internal server error",
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let len = if matches!(self, Self::InvalidFormBody(..)) { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("code", self.code())?;
        map.serialize_entry("message", self.message())?;
        if let Self::InvalidFormBody(errors) = self {
            map.serialize_entry("errors", errors)?;
        }
        map.end()
    }
}
