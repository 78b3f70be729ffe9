//! Infrastructure layer: account directories and resource stores.
//!
//! Every backend comes in two flavors: an in-memory one for tests/dev and a
//! Postgres one selected when a database URL is configured.

pub mod directory;
pub mod schema;
pub mod store;

pub use directory::{InMemoryAccountDirectory, PostgresAccountDirectory};
pub use schema::ensure_schema;
pub use store::{
    InMemoryResourceStore, OwnerRegistry, PostgresClubStore, PostgresTeamStore, ResourceStore,
    StoreError, StoredResource,
};

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Open a Postgres pool and apply the schema.
pub async fn connect_postgres(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    ensure_schema(&pool).await?;
    Ok(pool)
}
