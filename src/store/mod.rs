//! Persistence of user records.
//!
//! The rest of the crate talks to storage only through the
//! [`CredentialStore`] trait so the backing engine can be swapped
//! without touching access rules or handlers.
use async_trait::async_trait;
use thiserror::Error;

use crate::schema::{NewUser, User, UserChanges};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Insert attempted for a username that is already taken.
    #[error("user already exists")]
    Conflict,
    #[error("credential store is unavailable")]
    Unavailable,
    #[error("credential store query failed")]
    Query,
}

pub type Result<T> = error_stack::Result<T, Error>;

/// Offset pagination used by listing and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 100;

    #[must_use]
    pub const fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}

#[async_trait]
pub trait CredentialStore: std::fmt::Debug + Send + Sync {
    /// Point lookup by username.
    async fn find(&self, username: &str) -> Result<Option<User>>;

    /// All users ordered by username.
    async fn list(&self, page: Page) -> Result<Vec<User>>;

    /// Case-insensitive substring match over username, email and
    /// full name, ordered by username.
    async fn search(&self, query: &str, page: Page) -> Result<Vec<User>>;

    /// Inserts a new record, failing with [`Error::Conflict`] if the
    /// username exists. Two concurrent inserts of the same username
    /// never both succeed.
    async fn insert(&self, user: NewUser) -> Result<User>;

    /// Inserts the record or replaces the stored one entirely.
    async fn upsert(&self, user: NewUser) -> Result<User>;

    /// Applies a partial update. Returns `None` if the user does not exist.
    async fn update(&self, username: &str, changes: &UserChanges) -> Result<Option<User>>;
}
