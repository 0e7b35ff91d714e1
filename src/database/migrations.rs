use error_stack::ResultExt;

use super::{Connection, Error, Result};

/// Statements are idempotent so they can run on every startup.
const SCHEMA: &[&str] = &[r#"CREATE TABLE IF NOT EXISTS "users" (
    username       TEXT PRIMARY KEY,
    password_hash  TEXT NOT NULL,
    email          TEXT,
    full_name      TEXT,
    disabled       BOOLEAN NOT NULL DEFAULT FALSE,
    admin_channels TEXT[] NOT NULL DEFAULT '{}',
    admin_roles    TEXT[] NOT NULL DEFAULT '{}'
)"#];

#[tracing::instrument(skip_all, name = "db.migrate")]
pub async fn run(conn: &mut Connection) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&mut *conn)
            .await
            .change_context(Error::Migration)?;
    }
    tracing::debug!(statements = SCHEMA.len(), "database schema is up to date");
    Ok(())
}
