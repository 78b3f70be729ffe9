use std::sync::Arc;

use sqlx::PgPool;

use clubhouse_auth::{
    AccountDirectory, Argon2Hasher, AuthError, AuthService, Hs256TokenCodec, Principal,
    TokenConfig,
};
use clubhouse_clubs::{Club, Team};
use clubhouse_infra::{
    InMemoryAccountDirectory, InMemoryResourceStore, PostgresAccountDirectory, PostgresClubStore,
    PostgresTeamStore, ResourceStore,
};

/// Everything the handlers need, shared behind an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub clubs: Arc<dyn ResourceStore<Club>>,
    pub teams: Arc<dyn ResourceStore<Team>>,
}

impl AppServices {
    /// In-memory backends. The stores consult the directory so resources can
    /// only be created for accounts that still exist.
    pub fn in_memory(token: &TokenConfig) -> Self {
        let directory = Arc::new(InMemoryAccountDirectory::new());
        Self::with_backends(
            token,
            directory.clone(),
            Arc::new(InMemoryResourceStore::<Club>::with_owners(directory.clone())),
            Arc::new(InMemoryResourceStore::<Team>::with_owners(directory)),
        )
    }

    pub fn postgres(token: &TokenConfig, pool: PgPool) -> Self {
        Self::with_backends(
            token,
            Arc::new(PostgresAccountDirectory::new(pool.clone())),
            Arc::new(PostgresClubStore::new(pool.clone())),
            Arc::new(PostgresTeamStore::new(pool)),
        )
    }

    pub fn with_backends(
        token: &TokenConfig,
        directory: Arc<dyn AccountDirectory>,
        clubs: Arc<dyn ResourceStore<Club>>,
        teams: Arc<dyn ResourceStore<Team>>,
    ) -> Self {
        let auth = AuthService::new(
            directory,
            Arc::new(Argon2Hasher::default()),
            Arc::new(Hs256TokenCodec::new(token)),
        );
        Self { auth, clubs, teams }
    }

    /// Delete the account, then sweep its clubs and teams.
    ///
    /// Once the account is gone no store accepts new resources for it, so the
    /// sweep leaves nothing behind. Postgres cascades through its foreign keys
    /// and the sweep finds nothing there. Returns the number of resources the
    /// sweep removed.
    pub async fn delete_account(&self, principal: &Principal) -> Result<u64, AuthError> {
        self.auth.delete_account(principal).await?;

        let clubs = self
            .clubs
            .delete_by_owner(principal.id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let teams = self
            .teams
            .delete_by_owner(principal.id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(user_id = %principal.id, clubs, teams, "account resources removed");
        Ok(clubs + teams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clubhouse_auth::{DEFAULT_TOKEN_TTL, Handle};
    use clubhouse_clubs::{ClubDraft, TeamDraft};
    use clubhouse_infra::StoreError;

    fn services() -> AppServices {
        let token = TokenConfig::new("test-secret", "clubhouse", "clubhouse-api", DEFAULT_TOKEN_TTL)
            .unwrap();
        AppServices::in_memory(&token)
    }

    #[tokio::test]
    async fn deleted_account_cannot_gain_resources() {
        let services = services();
        let alice = services
            .auth
            .register(Handle::parse("alice01").unwrap(), "Passw0rd!")
            .await
            .unwrap();
        services
            .clubs
            .insert(alice.id, ClubDraft::new("Chess Club", None).unwrap())
            .await
            .unwrap();
        services
            .teams
            .insert(alice.id, TeamDraft::new("Red Lions").unwrap())
            .await
            .unwrap();

        assert_eq!(services.delete_account(&alice).await.unwrap(), 2);

        assert_eq!(
            services
                .clubs
                .insert(alice.id, ClubDraft::new("Go Club", None).unwrap())
                .await,
            Err(StoreError::OwnerNotFound)
        );
        assert_eq!(
            services
                .teams
                .insert(alice.id, TeamDraft::new("Blue Lions").unwrap())
                .await,
            Err(StoreError::OwnerNotFound)
        );
        assert!(services.clubs.list_by_owner(alice.id).await.unwrap().is_empty());
        assert!(services.teams.list_by_owner(alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_missing_account_touches_no_resources() {
        let services = services();
        let alice = services
            .auth
            .register(Handle::parse("alice01").unwrap(), "Passw0rd!")
            .await
            .unwrap();
        services.delete_account(&alice).await.unwrap();

        assert_eq!(services.delete_account(&alice).await, Err(AuthError::NotFound));
    }
}
