use error_stack::{Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{password, Authenticator, JwtAuthenticator};
use crate::mail::{LogMailer, Mailer};
use crate::schema::NewUser;
use crate::store::{CredentialStore, MemoryStore, PostgresStore};
use crate::{config, database, policy};

#[derive(Debug, Clone)]
pub struct App {
    pub config: Arc<config::Server>,
    pub store: Arc<dyn CredentialStore>,
    pub authenticator: Arc<dyn Authenticator>,
    pub mailer: Arc<dyn Mailer>,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
    /// Connects the configured store and creates the first superuser
    /// if one is configured.
    #[tracing::instrument(skip_all)]
    pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
        let store: Arc<dyn CredentialStore> = if let Some(db) = cfg.db.as_ref() {
            let pool = database::Pool::new(db).await.change_context(AppError)?;
            Arc::new(PostgresStore::connect(pool).await.change_context(AppError)?)
        } else {
            tracing::warn!("no database configured, users are kept in memory");
            Arc::new(MemoryStore::new())
        };

        let app = Self::from_parts(cfg, store, Arc::new(LogMailer));
        app.bootstrap_first_superuser().await?;

        Ok(app)
    }

    /// Assembles an [`App`] around an existing store and mailer. The
    /// authenticator is derived from the configured signing key.
    #[must_use]
    pub fn from_parts(
        cfg: config::Server,
        store: Arc<dyn CredentialStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let minutes = cfg
            .access_token_expire_minutes
            .get()
            .min(config::Server::MAX_ACCESS_TOKEN_EXPIRE_MINUTES);
        let lifetime = chrono::Duration::minutes(i64::try_from(minutes).unwrap_or(i64::MAX / 60_000));

        let authenticator =
            JwtAuthenticator::new(cfg.jwt_secret.as_bytes(), lifetime, store.clone());

        Self {
            config: Arc::new(cfg),
            store,
            authenticator: Arc::new(authenticator),
            mailer,
        }
    }

    /// Creates the configured first superuser unless it already exists.
    #[tracing::instrument(skip_all)]
    pub async fn bootstrap_first_superuser(&self) -> Result<(), AppError> {
        let Some(superuser) = self.config.first_superuser.as_ref() else {
            return Ok(());
        };

        let existing = self
            .store
            .find(&superuser.username)
            .await
            .change_context(AppError)?;

        if existing.is_some() {
            tracing::debug!(username = %superuser.username, "first superuser already exists");
            return Ok(());
        }

        let hash = password::hash_blocking(superuser.password.value().clone())
            .await
            .change_context(AppError)?;

        let user = NewUser {
            admin_roles: vec![policy::SUPERUSER_ROLE.to_string()],
            ..NewUser::new(superuser.username.as_str(), hash)
        };
        self.store.upsert(user).await.change_context(AppError)?;

        tracing::info!(username = %superuser.username, "created first superuser");
        Ok(())
    }
}
