use async_trait::async_trait;
use error_stack::{Report, ResultExt};

use super::{CredentialStore, Error, Page, Result};
use crate::database::{self, ErrorExt, ErrorExt2};
use crate::schema::{NewUser, User, UserChanges};

const COLUMNS: &str = "username, password_hash, email, full_name, disabled, admin_channels, admin_roles";

/// Credential store backed by the `users` table.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: database::Pool,
}

impl PostgresStore {
    pub async fn connect(pool: database::Pool) -> Result<Self> {
        let mut conn = pool.get().await.change_context(Error::Unavailable)?;
        database::migrations::run(&mut conn)
            .await
            .change_context(Error::Query)?;

        Ok(Self { pool })
    }

    async fn conn(&self) -> Result<database::PoolConnection> {
        self.pool.get().await.change_context(Error::Unavailable)
    }
}

fn into_store_error(report: Report<database::Error>) -> Report<Error> {
    if report.is_unique_violation() {
        report.change_context(Error::Conflict)
    } else if report.is_unhealthy() {
        report.change_context(Error::Unavailable)
    } else {
        report.change_context(Error::Query)
    }
}

fn bounds(page: Page) -> (i64, i64) {
    (i64::from(page.skip), i64::from(page.limit))
}

/// Escapes `LIKE` wildcards so the query is matched literally.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl CredentialStore for PostgresStore {
    #[tracing::instrument(skip(self))]
    async fn find(&self, username: &str) -> Result<Option<User>> {
        let mut conn = self.conn().await?;
        sqlx::query_as::<_, User>(&format!(
            r#"SELECT {COLUMNS} FROM "users" WHERE username = $1"#
        ))
        .bind(username)
        .fetch_optional(&mut *conn)
        .await
        .into_db_error()
        .map_err(into_store_error)
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self, page: Page) -> Result<Vec<User>> {
        let (skip, limit) = bounds(page);
        let mut conn = self.conn().await?;
        sqlx::query_as::<_, User>(&format!(
            r#"SELECT {COLUMNS} FROM "users" ORDER BY username OFFSET $1 LIMIT $2"#
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await
        .into_db_error()
        .map_err(into_store_error)
    }

    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &str, page: Page) -> Result<Vec<User>> {
        let (skip, limit) = bounds(page);
        let mut conn = self.conn().await?;
        sqlx::query_as::<_, User>(&format!(
            r#"SELECT {COLUMNS} FROM "users"
               WHERE username ILIKE $1 OR email ILIKE $1 OR full_name ILIKE $1
               ORDER BY username OFFSET $2 LIMIT $3"#
        ))
        .bind(like_pattern(query))
        .bind(skip)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await
        .into_db_error()
        .map_err(into_store_error)
    }

    #[tracing::instrument(skip_all, fields(username = %user.username))]
    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut conn = self.conn().await?;
        let inserted = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO "users" ({COLUMNS})
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT (username) DO NOTHING
               RETURNING {COLUMNS}"#
        ))
        .bind(&user.username)
        .bind(user.password_hash.as_str())
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(user.disabled)
        .bind(&user.admin_channels)
        .bind(&user.admin_roles)
        .fetch_optional(&mut *conn)
        .await
        .into_db_error()
        .map_err(into_store_error)?;

        inserted.ok_or_else(|| {
            Report::new(Error::Conflict)
                .attach_printable(format!("username {:?} is taken", user.username))
        })
    }

    #[tracing::instrument(skip_all, fields(username = %user.username))]
    async fn upsert(&self, user: NewUser) -> Result<User> {
        let mut conn = self.conn().await?;
        sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO "users" ({COLUMNS})
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT (username) DO UPDATE SET
                   password_hash = EXCLUDED.password_hash,
                   email = EXCLUDED.email,
                   full_name = EXCLUDED.full_name,
                   disabled = EXCLUDED.disabled,
                   admin_channels = EXCLUDED.admin_channels,
                   admin_roles = EXCLUDED.admin_roles
               RETURNING {COLUMNS}"#
        ))
        .bind(&user.username)
        .bind(user.password_hash.as_str())
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(user.disabled)
        .bind(&user.admin_channels)
        .bind(&user.admin_roles)
        .fetch_one(&mut *conn)
        .await
        .into_db_error()
        .map_err(into_store_error)
    }

    #[tracing::instrument(skip(self, changes))]
    async fn update(&self, username: &str, changes: &UserChanges) -> Result<Option<User>> {
        let mut conn = self.conn().await?;
        sqlx::query_as::<_, User>(&format!(
            r#"UPDATE "users" SET
                   password_hash = COALESCE($2, password_hash),
                   email = COALESCE($3, email),
                   full_name = COALESCE($4, full_name),
                   disabled = COALESCE($5, disabled),
                   admin_channels = COALESCE($6, admin_channels),
                   admin_roles = COALESCE($7, admin_roles)
               WHERE username = $1
               RETURNING {COLUMNS}"#
        ))
        .bind(username)
        .bind(changes.password_hash.as_ref().map(|v| v.as_str()))
        .bind(&changes.email)
        .bind(&changes.full_name)
        .bind(changes.disabled)
        .bind(&changes.admin_channels)
        .bind(&changes.admin_roles)
        .fetch_optional(&mut *conn)
        .await
        .into_db_error()
        .map_err(into_store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("bob"), "%bob%");
        assert_eq!(like_pattern("50%_off"), r"%50\%\_off%");
    }
}
