use serde::{Deserialize, Serialize};

use crate::util::Sensitive;
use crate::validate::{Validate, ValidateError};

#[derive(Debug, Deserialize, Serialize)]
pub struct Request {
    pub username: String,
    pub password: Sensitive<String>,
}

impl Validate for Request {
    fn validate(&self) -> Result<(), ValidateError> {
        let mut fields = ValidateError::field_builder();
        if self.username.is_empty() {
            let mut msg = ValidateError::msg_builder();
            msg.insert("Username is required");
            fields.insert("username", msg.build());
        }
        if self.password.is_empty() {
            let mut msg = ValidateError::msg_builder();
            msg.insert("Password is required");
            fields.insert("password", msg.build());
        }
        fields.build().into_result()
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Response {
    pub access_token: Sensitive<String>,
    pub token_type: String,
}

impl Response {
    #[must_use]
    pub fn bearer(token: String) -> Self {
        Self {
            access_token: Sensitive::new(token),
            token_type: "bearer".into(),
        }
    }
}
