//! Postgres backend checks. Run with a disposable database:
//!
//! `DATABASE_URL=postgres://... cargo test -p clubhouse-infra -- --ignored`

use std::time::{SystemTime, UNIX_EPOCH};

use clubhouse_auth::{AccountDirectory, DirectoryError, Handle, SecretHash};
use clubhouse_clubs::{Club, ClubDraft, Team, TeamDraft};
use clubhouse_core::UserId;
use clubhouse_infra::{
    PostgresAccountDirectory, PostgresClubStore, PostgresTeamStore, ResourceStore, StoreError,
    connect_postgres,
};

async fn pool() -> sqlx::PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
    connect_postgres(&url, 4).await.expect("failed to connect")
}

/// A handle unlikely to collide with earlier runs against the same database.
fn unique_handle(prefix: &str) -> Handle {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    Handle::parse(format!("{prefix}{}", nanos % 1_000_000_000_000)).unwrap()
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn directory_enforces_unique_handles() {
    let directory = PostgresAccountDirectory::new(pool().await);
    let handle = unique_handle("pg");

    let created = directory
        .insert(handle.clone(), SecretHash::new("hash"))
        .await
        .unwrap();
    assert_eq!(
        directory.insert(handle.clone(), SecretHash::new("hash")).await,
        Err(DirectoryError::HandleTaken)
    );

    assert_eq!(
        directory.find_by_handle(handle.as_str()).await.unwrap().map(|p| p.id),
        Some(created.id)
    );
    assert!(directory.exists_by_handle(handle.as_str()).await.unwrap());

    let renamed = unique_handle("pgr");
    let updated = directory.update_handle(created.id, renamed.clone()).await.unwrap();
    assert_eq!(updated.handle, renamed);
    assert!(!directory.exists_by_handle(handle.as_str()).await.unwrap());

    assert!(directory.delete(created.id).await.unwrap());
    assert_eq!(directory.find_by_id(created.id).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn resources_cascade_with_their_owner() {
    let pool = pool().await;
    let directory = PostgresAccountDirectory::new(pool.clone());
    let clubs = PostgresClubStore::new(pool.clone());
    let teams = PostgresTeamStore::new(pool);

    let owner = directory
        .insert(unique_handle("own"), SecretHash::new("hash"))
        .await
        .unwrap();

    let mut club: Club = clubs
        .insert(owner.id, ClubDraft::new("Chess Club", Some("https://chess.example.com")).unwrap())
        .await
        .unwrap();
    let team: Team = teams
        .insert(owner.id, TeamDraft::new("Red Lions").unwrap())
        .await
        .unwrap();

    club.apply(ClubDraft::new("Chess Masters", None).unwrap());
    clubs.update(club.clone()).await.unwrap();
    assert_eq!(clubs.get(club.id).await.unwrap(), Some(club.clone()));
    assert_eq!(teams.list_by_owner(owner.id).await.unwrap(), vec![team.clone()]);

    assert!(directory.delete(owner.id).await.unwrap());
    assert_eq!(clubs.get(club.id).await.unwrap(), None);
    assert_eq!(teams.get(team.id).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn insert_for_missing_owner_is_rejected() {
    let clubs = PostgresClubStore::new(pool().await);
    let err = clubs
        .insert(UserId::new(i64::MAX), ClubDraft::new("Ghost Club", None).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err, StoreError::OwnerNotFound);
}
