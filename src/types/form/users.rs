use serde::{Deserialize, Serialize};

use crate::store::Page;
use crate::types::validation::{
    is_valid_email, is_valid_password, is_valid_username, PASSWORD_MAX, USERNAME_MAX,
};
use crate::util::Sensitive;
use crate::validate::{FieldBuilder, Validate, ValidateError};

const fn default_limit() -> u32 {
    Page::DEFAULT_LIMIT
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl ListQuery {
    #[must_use]
    pub const fn page(&self) -> Page {
        Page::new(self.skip, self.limit)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl SearchQuery {
    #[must_use]
    pub const fn page(&self) -> Page {
        Page::new(self.skip, self.limit)
    }
}

impl Validate for SearchQuery {
    fn validate(&self) -> Result<(), ValidateError> {
        let mut fields = ValidateError::field_builder();
        fields.insert("q", {
            let mut msg = ValidateError::msg_builder();
            if self.q.trim().is_empty() {
                msg.insert("Search query must not be empty");
            }
            msg.build()
        });
        fields.build().into_result()
    }
}

/// Body of `POST /users/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateUser {
    pub username: String,
    pub password: Sensitive<String>,
    #[serde(default)]
    pub admin_channels: Vec<String>,
    #[serde(default)]
    pub admin_roles: Vec<String>,
    #[serde(default)]
    pub disabled: bool,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl Validate for CreateUser {
    fn validate(&self) -> Result<(), ValidateError> {
        let mut fields = ValidateError::field_builder();
        check_username(&mut fields, &self.username);
        check_password(&mut fields, Some(&self.password));
        check_email(&mut fields, self.email.as_deref());
        fields.build().into_result()
    }
}

/// Body of `PUT /users/{username}`. The username itself comes
/// from the path and cannot be changed.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateUser {
    pub password: Option<Sensitive<String>>,
    pub admin_channels: Option<Vec<String>>,
    pub admin_roles: Option<Vec<String>>,
    pub disabled: Option<bool>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl Validate for UpdateUser {
    fn validate(&self) -> Result<(), ValidateError> {
        let mut fields = ValidateError::field_builder();
        check_password(&mut fields, self.password.as_ref());
        check_email(&mut fields, self.email.as_deref());
        fields.build().into_result()
    }
}

/// Body of `PUT /users/me`. Any other field in the payload is
/// ignored so users cannot touch their own roles or status.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateCurrentUser {
    pub password: Option<Sensitive<String>>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl Validate for UpdateCurrentUser {
    fn validate(&self) -> Result<(), ValidateError> {
        let mut fields = ValidateError::field_builder();
        check_password(&mut fields, self.password.as_ref());
        check_email(&mut fields, self.email.as_deref());
        fields.build().into_result()
    }
}

/// Body of `POST /users/open`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenRegister {
    pub username: String,
    pub password: Sensitive<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl Validate for OpenRegister {
    fn validate(&self) -> Result<(), ValidateError> {
        let mut fields = ValidateError::field_builder();
        check_username(&mut fields, &self.username);
        check_password(&mut fields, Some(&self.password));
        check_email(&mut fields, self.email.as_deref());
        fields.build().into_result()
    }
}

fn check_username(fields: &mut FieldBuilder, username: &str) {
    let mut msg = ValidateError::msg_builder();
    if !is_valid_username(username) {
        msg.insert(format!(
            "Usernames must be 1 to {USERNAME_MAX} characters without spaces or slashes \
             and must not be a reserved word"
        ));
    }
    fields.insert("username", msg.build());
}

fn check_password(fields: &mut FieldBuilder, password: Option<&Sensitive<String>>) {
    let Some(password) = password else {
        return;
    };

    let mut msg = ValidateError::msg_builder();
    if !is_valid_password(password.as_str()) {
        msg.insert(format!(
            "Passwords must not be empty or longer than {PASSWORD_MAX} characters"
        ));
    }
    fields.insert("password", msg.build());
}

fn check_email(fields: &mut FieldBuilder, email: Option<&str>) {
    let Some(email) = email else {
        return;
    };

    let mut msg = ValidateError::msg_builder();
    if !is_valid_email(email) {
        msg.insert("Invalid e-mail address");
    }
    fields.insert("email", msg.build());
}
