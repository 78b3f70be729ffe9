//! Relational schema for the Postgres backend.
//!
//! Applied idempotently at startup.

use sqlx::PgPool;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          BIGSERIAL PRIMARY KEY,
        handle      VARCHAR(30) NOT NULL,
        secret_hash TEXT NOT NULL,
        CONSTRAINT users_handle_key UNIQUE (handle)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS clubs (
        id        BIGSERIAL PRIMARY KEY,
        name      VARCHAR(50) NOT NULL,
        http_link VARCHAR(2083),
        owner_id  BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS clubs_owner_idx ON clubs (owner_id)",
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id       BIGSERIAL PRIMARY KEY,
        name     VARCHAR(30) NOT NULL,
        owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS teams_owner_idx ON teams (owner_id)",
];

/// Create the users, clubs and teams tables if they do not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("database schema ready");
    Ok(())
}
