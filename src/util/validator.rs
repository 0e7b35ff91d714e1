use std::borrow::Cow;

use error_stack::Report;
use thiserror::Error;

use crate::validate::ValidateError;

#[derive(Debug, Error)]
#[error("Invalid given data occurred")]
pub struct Wrapper;

/// Flattens a [`ValidateError`] tree into printable report attachments,
/// one per message, prefixed with the dotted field path.
pub trait IntoValidatorReport<T> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper>;
}

impl<T> IntoValidatorReport<T> for Result<T, ValidateError> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper> {
        fn read_errors<'a>(
            err: &'a ValidateError,
            path: &mut Vec<Cow<'a, str>>,
            mut report: Report<Wrapper>,
        ) -> Report<Wrapper> {
            match err {
                ValidateError::Fields(fields) => {
                    for (field, data) in fields {
                        path.push(Cow::Borrowed(&**field));
                        report = read_errors(data, path, report);
                        path.pop();
                    }
                    report
                }
                ValidateError::Messages(messages) => {
                    let field = path.join(".");
                    for message in messages {
                        report = report.attach_printable(format!("{field}: {message}"));
                    }
                    report
                }
            }
        }

        self.map_err(|v| {
            let mut path = Vec::new();
            read_errors(&v, &mut path, Report::new(Wrapper))
        })
    }
}
