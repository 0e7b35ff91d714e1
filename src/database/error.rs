use error_stack::Report;
use thiserror::Error;

/// Database related errors
#[derive(Debug, Error)]
pub enum Error {
    /// The configured Postgres connection url could not be parsed.
    #[error("invalid connection url")]
    InvalidUrl,
    /// An error caused by an [`sqlx`] error.
    #[error("received a pool error: {0}")]
    Internal(sqlx::Error),
    /// A unique constraint rejected the write.
    #[error("unique constraint violated")]
    UniqueViolation,
    /// The pool has no reliable connection to the database.
    #[error("unhealthy database pool")]
    UnhealthyPool,
    #[error("could not apply schema migrations")]
    Migration,
}

/// Converts from a generic [sqlx] result into a [database compatible error](Error).
pub trait ErrorExt<T> {
    fn into_db_error(self) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, sqlx::Error> {
    fn into_db_error(self) -> Result<T> {
        self.map_err(|e| match &e {
            sqlx::Error::Database(err) if err.is_unique_violation() => {
                Report::new(e).change_context(Error::UniqueViolation)
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Report::new(e).change_context(Error::UnhealthyPool)
            }
            _ => Report::new(Error::Internal(e)),
        })
    }
}

/// Lazily typed [`std::result::Result`] but the error generic
/// is filled up with [a database error](Error).
pub type Result<T> = error_stack::Result<T, Error>;

pub trait ErrorExt2 {
    fn is_unhealthy(&self) -> bool;
    fn is_unique_violation(&self) -> bool;
}

impl ErrorExt2 for Report<Error> {
    fn is_unhealthy(&self) -> bool {
        matches!(self.current_context(), Error::UnhealthyPool)
    }

    fn is_unique_violation(&self) -> bool {
        matches!(self.current_context(), Error::UniqueViolation)
    }
}
