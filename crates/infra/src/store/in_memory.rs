use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use clubhouse_core::{Entity, UserId};

use super::{OwnerRegistry, ResourceStore, StoreError, StoredResource};

/// In-memory resource store for tests/dev. Ids start at 1.
///
/// With an [`OwnerRegistry`] attached, inserts for an owner that no longer
/// exists fail with `OwnerNotFound`. The check runs under the store's write
/// lock, so an insert racing an account deletion either lands before the
/// owner's resources are swept or is rejected.
pub struct InMemoryResourceStore<R> {
    inner: RwLock<Inner<R>>,
    owners: Option<Arc<dyn OwnerRegistry>>,
}

#[derive(Debug)]
struct Inner<R> {
    next_id: i64,
    items: BTreeMap<i64, R>,
}

impl<R> InMemoryResourceStore<R> {
    /// A store that trusts every owner id it is given.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                items: BTreeMap::new(),
            }),
            owners: None,
        }
    }

    pub fn with_owners(owners: Arc<dyn OwnerRegistry>) -> Self {
        Self {
            owners: Some(owners),
            ..Self::new()
        }
    }
}

impl<R> std::fmt::Debug for InMemoryResourceStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryResourceStore")
            .field("checks_owners", &self.owners.is_some())
            .finish_non_exhaustive()
    }
}

impl<R> Default for InMemoryResourceStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl<R: StoredResource> ResourceStore<R> for InMemoryResourceStore<R> {
    async fn insert(&self, owner_id: UserId, draft: R::Draft) -> Result<R, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        if let Some(owners) = &self.owners {
            if !owners.owner_exists(owner_id)? {
                return Err(StoreError::OwnerNotFound);
            }
        }
        let raw = inner.next_id;
        inner.next_id += 1;
        let resource = R::from_draft(raw.into(), owner_id, draft);
        inner.items.insert(raw, resource.clone());
        Ok(resource)
    }

    async fn get(&self, id: R::Id) -> Result<Option<R>, StoreError> {
        let key: i64 = id.into();
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.items.get(&key).cloned())
    }

    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<R>, StoreError> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .items
            .values()
            .filter(|r| r.owner_id() == owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, resource: R) -> Result<R, StoreError> {
        let key: i64 = resource.id().into();
        let mut inner = self.inner.write().map_err(poisoned)?;
        let slot = inner
            .items
            .get_mut(&key)
            .ok_or(StoreError::NotFound)?;
        *slot = resource.clone();
        Ok(resource)
    }

    async fn delete(&self, id: R::Id) -> Result<bool, StoreError> {
        let key: i64 = id.into();
        let mut inner = self.inner.write().map_err(poisoned)?;
        Ok(inner.items.remove(&key).is_some())
    }

    async fn delete_by_owner(&self, owner_id: UserId) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        let before = inner.items.len();
        inner.items.retain(|_, r| r.owner_id() != owner_id);
        Ok((before - inner.items.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clubhouse_clubs::{Club, ClubDraft, Team, TeamDraft};
    use clubhouse_core::{ClubId, TeamId};
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Owners(Mutex<HashSet<UserId>>);

    impl OwnerRegistry for Owners {
        fn owner_exists(&self, owner_id: UserId) -> Result<bool, StoreError> {
            Ok(self.0.lock().unwrap().contains(&owner_id))
        }
    }

    fn club(name: &str) -> ClubDraft {
        ClubDraft::new(name, None).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_owner() {
        let store = InMemoryResourceStore::<Club>::new();
        let a = store.insert(UserId::new(1), club("Chess Club")).await.unwrap();
        let b = store.insert(UserId::new(2), club("Go Club")).await.unwrap();

        assert_eq!(a.id, ClubId::new(1));
        assert_eq!(b.id, ClubId::new(2));
        assert_eq!(a.owner_id, UserId::new(1));
        assert_eq!(store.get(a.id).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn list_is_owner_scoped() {
        let store = InMemoryResourceStore::<Team>::new();
        store.insert(UserId::new(1), TeamDraft::new("Red Lions").unwrap()).await.unwrap();
        store.insert(UserId::new(2), TeamDraft::new("Blue Lions").unwrap()).await.unwrap();
        store.insert(UserId::new(1), TeamDraft::new("Gold Lions").unwrap()).await.unwrap();

        let names: Vec<String> = store
            .list_by_owner(UserId::new(1))
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Red Lions", "Gold Lions"]);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let store = InMemoryResourceStore::<Team>::new();
        let mut team = store.insert(UserId::new(1), TeamDraft::new("Red Lions").unwrap()).await.unwrap();

        team.apply(TeamDraft::new("Blue Lions").unwrap());
        store.update(team.clone()).await.unwrap();
        assert_eq!(store.get(team.id).await.unwrap().unwrap().name, "Blue Lions");

        assert!(store.delete(team.id).await.unwrap());
        assert!(!store.delete(team.id).await.unwrap());
        assert_eq!(store.get(team.id).await.unwrap(), None);
        assert_eq!(store.update(team).await, Err(StoreError::NotFound));
        assert_eq!(store.get(TeamId::new(99)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_by_owner_cascades_only_that_owner() {
        let store = InMemoryResourceStore::<Club>::new();
        store.insert(UserId::new(1), club("Chess Club")).await.unwrap();
        store.insert(UserId::new(1), club("Go Club")).await.unwrap();
        let kept = store.insert(UserId::new(2), club("Bridge Club")).await.unwrap();

        assert_eq!(store.delete_by_owner(UserId::new(1)).await.unwrap(), 2);
        assert!(store.list_by_owner(UserId::new(1)).await.unwrap().is_empty());
        assert_eq!(store.get(kept.id).await.unwrap(), Some(kept));
    }

    #[tokio::test]
    async fn insert_for_missing_owner_is_rejected_when_owners_are_checked() {
        let owners = Arc::new(Owners::default());
        owners.0.lock().unwrap().insert(UserId::new(1));
        let store = InMemoryResourceStore::<Club>::with_owners(owners.clone());

        let kept = store.insert(UserId::new(1), club("Chess Club")).await.unwrap();
        assert_eq!(
            store.insert(UserId::new(2), club("Go Club")).await,
            Err(StoreError::OwnerNotFound)
        );

        owners.0.lock().unwrap().remove(&UserId::new(1));
        assert_eq!(
            store.insert(UserId::new(1), club("Bridge Club")).await,
            Err(StoreError::OwnerNotFound)
        );

        // Rejected inserts consume no id.
        assert_eq!(store.list_by_owner(UserId::new(1)).await.unwrap(), vec![kept]);
        owners.0.lock().unwrap().insert(UserId::new(2));
        let next = store.insert(UserId::new(2), club("Go Club")).await.unwrap();
        assert_eq!(next.id, ClubId::new(2));
    }
}
