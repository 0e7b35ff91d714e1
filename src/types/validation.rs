use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$")
        .expect("compile email regex")
});

pub const EMAIL_MAX: usize = 254;
pub const USERNAME_MAX: usize = 254;
pub const PASSWORD_MIN: usize = 1;
pub const PASSWORD_MAX: usize = 128;

/// Path segments under `/users/` that would shadow a user's own
/// `/users/{username}` resource.
pub const RESERVED_USERNAMES: &[&str] = &["me", "open", "search"];

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= EMAIL_MAX && EMAIL_REGEX.is_match(email)
}

pub fn is_valid_password(pass: &str) -> bool {
    (PASSWORD_MIN..=PASSWORD_MAX).contains(&pass.chars().count())
}

/// Usernames double as URL path segments and are frequently email
/// addresses, so only characters that break routing are rejected.
pub fn is_valid_username(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= USERNAME_MAX
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '/')
        && !RESERVED_USERNAMES.contains(&name)
}
