//! Postgres-backed club and team stores.
//!
//! Rows reference `users(id)` with `ON DELETE CASCADE`, so deleting an account
//! removes its resources in the same statement.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (foreign key violation) | `23503` | `OwnerNotFound` |
//! | Database (other) | Any other | `Backend` |
//! | Other | N/A | `Backend` |

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use clubhouse_clubs::{Club, ClubDraft, Team, TeamDraft};
use clubhouse_core::{ClubId, TeamId, UserId};

use super::{ResourceStore, StoreError};

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23503") {
                return StoreError::OwnerNotFound;
            }
            tracing::error!(operation, error = %db_err, "postgres store failure");
            StoreError::Backend(format!("database error in {}: {}", operation, db_err.message()))
        }
        other => {
            tracing::error!(operation, error = %other, "postgres store failure");
            StoreError::Backend(format!("sqlx error in {}: {}", operation, other))
        }
    }
}

pub struct PostgresClubStore {
    pool: PgPool,
}

impl PostgresClubStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn club_from_row(row: &PgRow) -> Result<Club, sqlx::Error> {
    Ok(Club {
        id: ClubId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        http_link: row.try_get("http_link")?,
        owner_id: UserId::new(row.try_get("owner_id")?),
    })
}

#[async_trait]
impl ResourceStore<Club> for PostgresClubStore {
    #[instrument(skip(self, draft), fields(owner_id = %owner_id), err)]
    async fn insert(&self, owner_id: UserId, draft: ClubDraft) -> Result<Club, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO clubs (name, http_link, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, http_link, owner_id
            "#,
        )
        .bind(draft.name())
        .bind(draft.http_link())
        .bind(owner_id.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_club", e))?;

        club_from_row(&row).map_err(|e| map_sqlx_error("decode_club", e))
    }

    async fn get(&self, id: ClubId) -> Result<Option<Club>, StoreError> {
        let row = sqlx::query("SELECT id, name, http_link, owner_id FROM clubs WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_club", e))?;

        row.as_ref()
            .map(club_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("decode_club", e))
    }

    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Club>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, http_link, owner_id FROM clubs WHERE owner_id = $1 ORDER BY id",
        )
        .bind(owner_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_clubs", e))?;

        rows.iter()
            .map(club_from_row)
            .collect::<Result<_, _>>()
            .map_err(|e| map_sqlx_error("decode_club", e))
    }

    async fn update(&self, club: Club) -> Result<Club, StoreError> {
        let result = sqlx::query("UPDATE clubs SET name = $2, http_link = $3 WHERE id = $1")
            .bind(club.id.get())
            .bind(&club.name)
            .bind(club.http_link.as_deref())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_club", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(club)
    }

    async fn delete(&self, id: ClubId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM clubs WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_club", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(owner_id = %owner_id), err)]
    async fn delete_by_owner(&self, owner_id: UserId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM clubs WHERE owner_id = $1")
            .bind(owner_id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_clubs_by_owner", e))?;
        Ok(result.rows_affected())
    }
}

pub struct PostgresTeamStore {
    pool: PgPool,
}

impl PostgresTeamStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn team_from_row(row: &PgRow) -> Result<Team, sqlx::Error> {
    Ok(Team {
        id: TeamId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        owner_id: UserId::new(row.try_get("owner_id")?),
    })
}

#[async_trait]
impl ResourceStore<Team> for PostgresTeamStore {
    #[instrument(skip(self, draft), fields(owner_id = %owner_id), err)]
    async fn insert(&self, owner_id: UserId, draft: TeamDraft) -> Result<Team, StoreError> {
        let row = sqlx::query(
            "INSERT INTO teams (name, owner_id) VALUES ($1, $2) RETURNING id, name, owner_id",
        )
        .bind(draft.name())
        .bind(owner_id.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_team", e))?;

        team_from_row(&row).map_err(|e| map_sqlx_error("decode_team", e))
    }

    async fn get(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        let row = sqlx::query("SELECT id, name, owner_id FROM teams WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_team", e))?;

        row.as_ref()
            .map(team_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("decode_team", e))
    }

    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Team>, StoreError> {
        let rows = sqlx::query("SELECT id, name, owner_id FROM teams WHERE owner_id = $1 ORDER BY id")
            .bind(owner_id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_teams", e))?;

        rows.iter()
            .map(team_from_row)
            .collect::<Result<_, _>>()
            .map_err(|e| map_sqlx_error("decode_team", e))
    }

    async fn update(&self, team: Team) -> Result<Team, StoreError> {
        let result = sqlx::query("UPDATE teams SET name = $2 WHERE id = $1")
            .bind(team.id.get())
            .bind(&team.name)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_team", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(team)
    }

    async fn delete(&self, id: TeamId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_team", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(owner_id = %owner_id), err)]
    async fn delete_by_owner(&self, owner_id: UserId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM teams WHERE owner_id = $1")
            .bind(owner_id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_teams_by_owner", e))?;
        Ok(result.rows_affected())
    }
}
