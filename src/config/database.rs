use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};

use crate::util::Sensitive;
use crate::validate::{Validate, ValidateError};

/// Connection settings for the Postgres credential store.
#[derive(Debug, Deserialize)]
pub struct Database {
    /// Connection URL connecting to the Postgres database.
    ///
    /// **Environment variables**:
    /// - `USERBASE_DB_URL` or `DATABASE_URL`
    pub url: Sensitive<String>,
    /// Maximum amount of connections kept in the pool.
    ///
    /// **Environment variables**:
    /// - `USERBASE_DB_POOL_SIZE`
    #[serde(default = "Database::default_pool_size")]
    pub pool_size: NonZeroU32,
    /// Minimum idle connections.
    ///
    /// **Environment variables**:
    /// - `USERBASE_DB_MIN_IDLE`
    pub min_idle: Option<NonZeroU32>,
    /// How long to wait for a connection to be acquired
    /// before the request fails.
    ///
    /// **Environment variables**:
    /// - `USERBASE_DB_TIMEOUT_SECS`
    #[serde(default = "Database::default_timeout_secs")]
    pub timeout_secs: NonZeroU64,
    /// Require TLS for every database connection.
    ///
    /// **Environment variables**:
    /// - `USERBASE_DB_ENFORCE_TLS`
    #[serde(default)]
    pub enforce_tls: bool,
}

impl Database {
    const DEFAULT_POOL_SIZE: u32 = 5;
    const DEFAULT_TIMEOUT_SECS: u64 = 5;

    const fn default_pool_size() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
        }
    }

    const fn default_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
        }
    }
}

impl Validate for Database {
    fn validate(&self) -> Result<(), ValidateError> {
        let mut fields = ValidateError::field_builder();
        fields.insert("url", {
            let mut msg = ValidateError::msg_builder();
            match url::Url::parse(self.url.as_str()) {
                Ok(url) if matches!(url.scheme(), "postgres" | "postgresql") => {}
                Ok(..) => msg.insert("Database URL must use the postgres scheme"),
                Err(..) => msg.insert("Invalid Postgres connection URL"),
            }
            msg.build()
        });
        fields.insert("min_idle", {
            let mut msg = ValidateError::msg_builder();
            if self.min_idle.is_some_and(|n| n > self.pool_size) {
                msg.insert("Must not exceed pool_size");
            }
            msg.build()
        });
        fields.build().into_result()
    }
}
