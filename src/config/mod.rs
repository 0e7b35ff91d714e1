use serde::Deserialize;
use thiserror::Error;

use crate::util::Sensitive;

mod database;
mod server;

pub use database::Database;
pub use server::Server;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;

/// Outgoing e-mail notifications.
#[derive(Debug, Default, Deserialize)]
pub struct Emails {
    /// **Environment variables**: `USERBASE_EMAILS_ENABLED`
    #[serde(default)]
    pub enabled: bool,
    /// **Environment variables**: `USERBASE_EMAILS_FROM`
    pub from: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FirstSuperuser {
    /// **Environment variables**: `USERBASE_FIRST_SUPERUSER`
    pub username: String,
    /// **Environment variables**: `USERBASE_FIRST_SUPERUSER_PASSWORD`
    pub password: Sensitive<String>,
}
