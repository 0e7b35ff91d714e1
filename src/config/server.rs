use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::{NonZeroU64, NonZeroUsize};
use std::path::Path;

use super::{Database, Emails, FirstSuperuser, ParseError};
use crate::types::validation::{is_valid_password, is_valid_username};
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport, Sensitive};
use crate::validate::{Validate, ValidateError};

#[derive(Debug, Deserialize)]
pub struct Server {
    /// **Environment variables**: `USERBASE_ADDRESS`
    #[serde(default = "Server::default_address")]
    pub address: IpAddr,
    /// **Environment variables**: `USERBASE_PORT`
    #[serde(default = "Server::default_port")]
    pub port: u16,
    /// Amount of HTTP worker threads.
    ///
    /// **Environment variables**: `USERBASE_WORKERS`
    #[serde(default = "Server::default_workers")]
    pub workers: NonZeroUsize,
    /// Root path every route is mounted under.
    ///
    /// **Environment variables**: `USERBASE_API_PREFIX`
    #[serde(default = "Server::default_api_prefix")]
    pub api_prefix: String,
    /// Shown in the API description and in outgoing e-mails.
    ///
    /// **Environment variables**: `USERBASE_PROJECT_NAME`
    #[serde(default = "Server::default_project_name")]
    pub project_name: String,
    /// One of `trace`, `debug`, `info`, `warn` or `error`.
    ///
    /// **Environment variables**: `USERBASE_LOG_LEVEL`
    #[serde(default = "Server::default_log_level")]
    pub log_level: String,
    /// Key used to sign access tokens.
    ///
    /// **Environment variables**: `USERBASE_JWT_SECRET`
    pub jwt_secret: Sensitive<String>,
    /// **Environment variables**: `USERBASE_ACCESS_TOKEN_EXPIRE_MINUTES`
    #[serde(default = "Server::default_access_token_expire_minutes")]
    pub access_token_expire_minutes: NonZeroU64,
    /// Allows anyone to create an account through `POST /users/open`.
    ///
    /// **Environment variables**: `USERBASE_USERS_OPEN_REGISTRATION`
    #[serde(default)]
    pub users_open_registration: bool,
    #[serde(default)]
    pub emails: Emails,
    /// Account created with the superuser role on startup unless it
    /// already exists.
    pub first_superuser: Option<FirstSuperuser>,
    /// Without it, users live in memory and are lost on shutdown.
    pub db: Option<Database>,
}

impl Server {
    pub fn load(file: Option<&Path>) -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment(file)
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config
            .validate()
            .into_validator_report()
            .change_context(ParseError)?;

        Ok(config)
    }

    /// Builds a configuration with every optional setting left at its
    /// default, keeping users in memory.
    #[must_use]
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            address: Self::default_address(),
            port: Self::default_port(),
            workers: Self::default_workers(),
            api_prefix: Self::default_api_prefix(),
            project_name: Self::default_project_name(),
            log_level: Self::default_log_level(),
            jwt_secret: Sensitive::new(jwt_secret.into()),
            access_token_expire_minutes: Self::default_access_token_expire_minutes(),
            users_open_registration: false,
            emails: Emails::default(),
            first_superuser: None,
            db: None,
        }
    }

    #[must_use]
    pub fn level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "userbase.toml";
    const DEFAULT_PORT: u16 = 8080;
    const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: u64 = 60 * 24 * 8;
    /// Ten years.
    pub const MAX_ACCESS_TOKEN_EXPIRE_MINUTES: u64 = 60 * 24 * 365 * 10;

    /// Creates a [`Figment`](figment::Figment) which reads the config
    /// file first and lets environment variables override it.
    pub(crate) fn figment(file: Option<&Path>) -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        let file = file.unwrap_or_else(|| Path::new(Self::DEFAULT_CONFIG_FILE));
        Figment::new()
            .merge(Toml::file(file))
            // Nested keys cannot be told apart from keys containing an
            // underscore, so every nested one is spelled out here.
            .merge(Env::prefixed("USERBASE_").map(|key| {
                let key = key.as_str().to_ascii_lowercase();
                match key.as_str() {
                    "emails_enabled" => "emails.enabled".into(),
                    "emails_from" => "emails.from".into(),

                    "first_superuser" => "first_superuser.username".into(),
                    "first_superuser_password" => "first_superuser.password".into(),

                    "db_url" => "db.url".into(),
                    "db_pool_size" => "db.pool_size".into(),
                    "db_min_idle" => "db.min_idle".into(),
                    "db_timeout_secs" => "db.timeout_secs".into(),
                    "db_enforce_tls" => "db.enforce_tls".into(),

                    _ => key.into(),
                }
            }))
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "db.url".into()))
    }

    fn default_address() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    const fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    fn default_workers() -> NonZeroUsize {
        std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
    }

    fn default_api_prefix() -> String {
        "/api/v1".into()
    }

    fn default_project_name() -> String {
        "userbase".into()
    }

    fn default_log_level() -> String {
        "info".into()
    }

    const fn default_access_token_expire_minutes() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES) {
            Some(n) => n,
            None => panic!("DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES is accidentally set to 0"),
        }
    }
}

impl Validate for Server {
    fn validate(&self) -> std::result::Result<(), ValidateError> {
        let mut fields = ValidateError::field_builder();

        fields.insert("jwt_secret", {
            let mut msg = ValidateError::msg_builder();
            if !(12..=1024).contains(&self.jwt_secret.len()) {
                msg.insert("JWT secret key must be 12 to 1024 characters long");
            }
            msg.build()
        });

        fields.insert("api_prefix", {
            let mut msg = ValidateError::msg_builder();
            if !self.api_prefix.is_empty()
                && (!self.api_prefix.starts_with('/') || self.api_prefix.ends_with('/'))
            {
                msg.insert("API prefix must start with '/' and must not end with '/'");
            }
            msg.build()
        });

        fields.insert("access_token_expire_minutes", {
            let mut msg = ValidateError::msg_builder();
            if self.access_token_expire_minutes.get() > Self::MAX_ACCESS_TOKEN_EXPIRE_MINUTES {
                msg.insert("Access tokens must not live longer than ten years");
            }
            msg.build()
        });

        fields.insert("log_level", {
            let mut msg = ValidateError::msg_builder();
            if self.log_level.parse::<tracing::Level>().is_err() {
                msg.insert("Unknown log level");
            }
            msg.build()
        });

        if let Some(superuser) = self.first_superuser.as_ref() {
            let mut inner = ValidateError::field_builder();
            if !is_valid_username(&superuser.username) {
                inner.insert("username", {
                    let mut msg = ValidateError::msg_builder();
                    msg.insert("Invalid username");
                    msg.build()
                });
            }
            if !is_valid_password(superuser.password.as_str()) {
                inner.insert("password", {
                    let mut msg = ValidateError::msg_builder();
                    msg.insert("Invalid password");
                    msg.build()
                });
            }
            fields.insert("first_superuser", inner.build());
        }

        if let Err(error) = self.db.validate() {
            fields.insert("db", error);
        }

        fields.build().into_result()
    }
}
