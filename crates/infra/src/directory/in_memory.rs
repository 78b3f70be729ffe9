use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use clubhouse_auth::{AccountDirectory, DirectoryError, Handle, Principal, SecretHash};
use clubhouse_core::UserId;

use crate::store::{OwnerRegistry, StoreError};

/// In-memory account directory for tests/dev.
///
/// Handle uniqueness is checked and written under one write lock, so concurrent
/// registrations of the same handle admit exactly one.
#[derive(Debug, Default)]
pub struct InMemoryAccountDirectory {
    inner: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    by_id: HashMap<UserId, Principal>,
    by_handle: HashMap<Handle, UserId>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> DirectoryError {
    DirectoryError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl AccountDirectory for InMemoryAccountDirectory {
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Principal>, DirectoryError> {
        let state = self.inner.read().map_err(poisoned)?;
        let Ok(handle) = Handle::parse(handle) else {
            return Ok(None);
        };
        Ok(state
            .by_handle
            .get(&handle)
            .and_then(|id| state.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Principal>, DirectoryError> {
        let state = self.inner.read().map_err(poisoned)?;
        Ok(state.by_id.get(&id).cloned())
    }

    async fn exists_by_handle(&self, handle: &str) -> Result<bool, DirectoryError> {
        Ok(self.find_by_handle(handle).await?.is_some())
    }

    async fn insert(&self, handle: Handle, secret_hash: SecretHash) -> Result<Principal, DirectoryError> {
        let mut state = self.inner.write().map_err(poisoned)?;
        if state.by_handle.contains_key(&handle) {
            return Err(DirectoryError::HandleTaken);
        }

        state.last_id += 1;
        let principal = Principal {
            id: UserId::new(state.last_id),
            handle: handle.clone(),
            secret_hash,
        };
        state.by_handle.insert(handle, principal.id);
        state.by_id.insert(principal.id, principal.clone());
        Ok(principal)
    }

    async fn update_handle(&self, id: UserId, handle: Handle) -> Result<Principal, DirectoryError> {
        let mut state = self.inner.write().map_err(poisoned)?;
        match state.by_handle.get(&handle) {
            Some(owner) if *owner != id => return Err(DirectoryError::HandleTaken),
            _ => {}
        }

        let principal = state.by_id.get_mut(&id).ok_or(DirectoryError::NotFound)?;
        let old = std::mem::replace(&mut principal.handle, handle.clone());
        let updated = principal.clone();

        state.by_handle.remove(&old);
        state.by_handle.insert(handle, id);
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> Result<bool, DirectoryError> {
        let mut state = self.inner.write().map_err(poisoned)?;
        let Some(principal) = state.by_id.remove(&id) else {
            return Ok(false);
        };
        state.by_handle.remove(&principal.handle);
        Ok(true)
    }
}

impl OwnerRegistry for InMemoryAccountDirectory {
    fn owner_exists(&self, owner_id: UserId) -> Result<bool, StoreError> {
        let state = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(state.by_id.contains_key(&owner_id))
    }
}
