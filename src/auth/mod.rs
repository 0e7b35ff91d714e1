use async_trait::async_trait;
use thiserror::Error;

use crate::schema::User;

mod jwt;
pub mod password;

pub use jwt::{Claims, JwtAuthenticator};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid or expired access token")]
    InvalidToken,
    #[error("access token refers to an unknown user")]
    UnknownUser,
    #[error("could not look up the token holder")]
    Store,
    #[error("could not issue an access token")]
    Issue,
}

/// Turns bearer tokens into live user records.
#[async_trait]
pub trait Authenticator: std::fmt::Debug + Send + Sync {
    async fn resolve(&self, token: &str) -> error_stack::Result<User, AuthError>;

    fn issue(&self, user: &User) -> error_stack::Result<String, AuthError>;
}
