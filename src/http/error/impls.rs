use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::Report;

use super::Error;
use crate::auth::{password, AuthError};
use crate::store;
use crate::types::Error as ErrorType;
use crate::validate::ValidateError;

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            ErrorType::Unauthenticated
            | ErrorType::InactiveUser
            | ErrorType::UserExists
            | ErrorType::IncorrectCredentials
            | ErrorType::InvalidFormBody(..) => StatusCode::BAD_REQUEST,
            ErrorType::Forbidden | ErrorType::RegistrationClosed => StatusCode::FORBIDDEN,
            ErrorType::UserNotFound => StatusCode::NOT_FOUND,
            ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        if self.status_code().is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(error.code = self.error_type.code(), report = ?self.report, "request rejected");
        }
        HttpResponse::build(self.status_code()).json(&self.error_type)
    }
}

impl From<Report<store::Error>> for Error {
    fn from(value: Report<store::Error>) -> Self {
        match value.current_context() {
            store::Error::Conflict => Error::from_report(ErrorType::UserExists, value),
            store::Error::Unavailable | store::Error::Query => {
                Error::from_report(ErrorType::Internal, value)
            }
        }
    }
}

impl From<Report<AuthError>> for Error {
    fn from(value: Report<AuthError>) -> Self {
        match value.current_context() {
            AuthError::InvalidToken | AuthError::UnknownUser => {
                Error::from_report(ErrorType::Unauthenticated, value)
            }
            AuthError::Store | AuthError::Issue => Error::from_report(ErrorType::Internal, value),
        }
    }
}

impl From<Report<password::HashPasswordError>> for Error {
    fn from(value: Report<password::HashPasswordError>) -> Self {
        Error::from_report(ErrorType::Internal, value)
    }
}

impl From<Report<password::VerifyPasswordError>> for Error {
    fn from(value: Report<password::VerifyPasswordError>) -> Self {
        Error::from_report(ErrorType::Internal, value)
    }
}

impl From<ValidateError> for Error {
    fn from(value: ValidateError) -> Self {
        #[derive(Debug, thiserror::Error)]
        #[error("Validation error occurred")]
        struct ValidateFailed;
        Error::from_context(ErrorType::InvalidFormBody(value), ValidateFailed)
    }
}
