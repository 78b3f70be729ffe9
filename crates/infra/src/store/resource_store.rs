use async_trait::async_trait;
use thiserror::Error;

use clubhouse_clubs::{Club, ClubDraft, Team, TeamDraft};
use clubhouse_core::{OwnedResource, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("resource not found")]
    NotFound,

    /// The owner referenced at creation time does not exist.
    #[error("owner does not exist")]
    OwnerNotFound,

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// An owned resource that a [`ResourceStore`] can materialise from a draft.
pub trait StoredResource:
    OwnedResource<Id: Send + Sync + From<i64> + Into<i64>> + Clone + Send + Sync + 'static
{
    type Draft: Send + 'static;

    fn from_draft(id: Self::Id, owner_id: UserId, draft: Self::Draft) -> Self;
}

impl StoredResource for Club {
    type Draft = ClubDraft;

    fn from_draft(id: Self::Id, owner_id: UserId, draft: ClubDraft) -> Self {
        Club::from_draft(id, owner_id, draft)
    }
}

impl StoredResource for Team {
    type Draft = TeamDraft;

    fn from_draft(id: Self::Id, owner_id: UserId, draft: TeamDraft) -> Self {
        Team::from_draft(id, owner_id, draft)
    }
}

/// Synchronous owner lookup for stores that cannot lean on a foreign key.
///
/// Called while the store holds its own write lock, so implementations must
/// not block on anything that could wait for that lock.
pub trait OwnerRegistry: Send + Sync {
    fn owner_exists(&self, owner_id: UserId) -> Result<bool, StoreError>;
}

/// Persistence for one owned resource type.
///
/// Stores do not enforce ownership on reads/writes; callers apply the
/// existence-then-ownership check before mutating.
#[async_trait]
pub trait ResourceStore<R: StoredResource>: Send + Sync {
    /// Persist a new resource owned by `owner_id`, assigning its id.
    ///
    /// `OwnerNotFound` if the owner no longer exists.
    async fn insert(&self, owner_id: UserId, draft: R::Draft) -> Result<R, StoreError>;

    async fn get(&self, id: R::Id) -> Result<Option<R>, StoreError>;

    /// All resources owned by `owner_id`, in id order.
    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<R>, StoreError>;

    /// Overwrite an existing resource (`NotFound` if it has been removed).
    async fn update(&self, resource: R) -> Result<R, StoreError>;

    /// Returns `false` if the resource did not exist.
    async fn delete(&self, id: R::Id) -> Result<bool, StoreError>;

    /// Remove everything owned by `owner_id` (account deletion cascade).
    async fn delete_by_owner(&self, owner_id: UserId) -> Result<u64, StoreError>;
}
