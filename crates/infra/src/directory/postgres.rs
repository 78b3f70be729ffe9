//! Postgres-backed account directory.
//!
//! Handle uniqueness is enforced by the `users_handle_key` unique constraint;
//! a losing concurrent insert surfaces as `23505` and maps to `HandleTaken`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use clubhouse_auth::{AccountDirectory, DirectoryError, Handle, Principal, SecretHash};
use clubhouse_core::UserId;

#[derive(Debug, Clone)]
pub struct PostgresAccountDirectory {
    pool: PgPool,
}

impl PostgresAccountDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn principal_from_row(row: &PgRow) -> Result<Principal, DirectoryError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DirectoryError::Backend(format!("failed to read id: {}", e)))?;
    let handle: String = row
        .try_get("handle")
        .map_err(|e| DirectoryError::Backend(format!("failed to read handle: {}", e)))?;
    let secret_hash: String = row
        .try_get("secret_hash")
        .map_err(|e| DirectoryError::Backend(format!("failed to read secret_hash: {}", e)))?;

    Ok(Principal {
        id: UserId::new(id),
        handle: Handle::parse(handle).map_err(|e| DirectoryError::Backend(e.to_string()))?,
        secret_hash: SecretHash::new(secret_hash),
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> DirectoryError {
    if is_unique_violation(&err) {
        return DirectoryError::HandleTaken;
    }
    tracing::error!(operation, error = %err, "postgres directory failure");
    DirectoryError::Backend(format!("sqlx error in {}: {}", operation, err))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

#[async_trait]
impl AccountDirectory for PostgresAccountDirectory {
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Principal>, DirectoryError> {
        let row = sqlx::query("SELECT id, handle, secret_hash FROM users WHERE handle = $1")
            .bind(handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_handle", e))?;

        row.as_ref().map(principal_from_row).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Principal>, DirectoryError> {
        let row = sqlx::query("SELECT id, handle, secret_hash FROM users WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(principal_from_row).transpose()
    }

    async fn exists_by_handle(&self, handle: &str) -> Result<bool, DirectoryError> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM users WHERE handle = $1) AS taken")
            .bind(handle)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists_by_handle", e))?;

        row.try_get("taken")
            .map_err(|e| DirectoryError::Backend(format!("failed to read taken: {}", e)))
    }

    #[instrument(skip(self, secret_hash), fields(handle = %handle), err)]
    async fn insert(&self, handle: Handle, secret_hash: SecretHash) -> Result<Principal, DirectoryError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (handle, secret_hash)
            VALUES ($1, $2)
            RETURNING id, handle, secret_hash
            "#,
        )
        .bind(handle.as_str())
        .bind(secret_hash.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;

        principal_from_row(&row)
    }

    #[instrument(skip(self), fields(user_id = %id, handle = %handle), err)]
    async fn update_handle(&self, id: UserId, handle: Handle) -> Result<Principal, DirectoryError> {
        let row = sqlx::query(
            r#"
            UPDATE users SET handle = $2
            WHERE id = $1
            RETURNING id, handle, secret_hash
            "#,
        )
        .bind(id.get())
        .bind(handle.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_handle", e))?;

        match row {
            Some(row) => principal_from_row(&row),
            None => Err(DirectoryError::NotFound),
        }
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn delete(&self, id: UserId) -> Result<bool, DirectoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_user", e))?;
        Ok(result.rows_affected() > 0)
    }
}
