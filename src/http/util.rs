//! Extractor configuration shared by every route.
//!
//! Payloads that cannot be deserialized are reported the same way
//! as payloads that fail validation.
use actix_web::{error::JsonPayloadError, web, HttpRequest};

use super::Error;
use crate::validate::ValidateError;

fn invalid(field: &'static str, message: String) -> actix_web::Error {
    Error::from(ValidateError::single(field, message)).into()
}

#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|error: JsonPayloadError, _req: &HttpRequest| {
        invalid("body", error.to_string())
    })
}

#[must_use]
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|error, _req| invalid("body", error.to_string()))
}

#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|error, _req| invalid("query", error.to_string()))
}

#[must_use]
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|error, _req| invalid("path", error.to_string()))
}
