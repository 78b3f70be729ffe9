//! Lightweight collaborators for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use clubhouse_core::UserId;

use crate::directory::{AccountDirectory, DirectoryError};
use crate::hasher::{CredentialHasher, HashError};
use crate::principal::{Handle, Principal, SecretHash};

/// Reversible "hash" so tests do not pay for Argon2.
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, plaintext: &str) -> Result<SecretHash, HashError> {
        Ok(SecretHash::new(format!("plain:{plaintext}")))
    }

    fn verify(&self, plaintext: &str, hash: &SecretHash) -> bool {
        hash.as_str().strip_prefix("plain:") == Some(plaintext)
    }
}

/// `PlainHasher` that counts how many verifications it has run.
#[derive(Default)]
pub struct CountingHasher {
    verified: AtomicUsize,
}

impl CountingHasher {
    pub fn verifications(&self) -> usize {
        self.verified.load(Ordering::SeqCst)
    }
}

impl CredentialHasher for CountingHasher {
    fn hash(&self, plaintext: &str) -> Result<SecretHash, HashError> {
        PlainHasher.hash(plaintext)
    }

    fn verify(&self, plaintext: &str, hash: &SecretHash) -> bool {
        self.verified.fetch_add(1, Ordering::SeqCst);
        PlainHasher.verify(plaintext, hash)
    }
}

#[derive(Default)]
pub struct MemoryDirectory {
    inner: Mutex<(i64, HashMap<UserId, Principal>)>,
}

#[async_trait]
impl AccountDirectory for MemoryDirectory {
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Principal>, DirectoryError> {
        let guard = self.inner.lock().unwrap();
        Ok(guard.1.values().find(|p| p.handle.as_str() == handle).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Principal>, DirectoryError> {
        Ok(self.inner.lock().unwrap().1.get(&id).cloned())
    }

    async fn exists_by_handle(&self, handle: &str) -> Result<bool, DirectoryError> {
        Ok(self.find_by_handle(handle).await?.is_some())
    }

    async fn insert(&self, handle: Handle, secret_hash: SecretHash) -> Result<Principal, DirectoryError> {
        let mut guard = self.inner.lock().unwrap();
        if guard.1.values().any(|p| p.handle == handle) {
            return Err(DirectoryError::HandleTaken);
        }
        guard.0 += 1;
        let principal = Principal {
            id: UserId::new(guard.0),
            handle,
            secret_hash,
        };
        guard.1.insert(principal.id, principal.clone());
        Ok(principal)
    }

    async fn update_handle(&self, id: UserId, handle: Handle) -> Result<Principal, DirectoryError> {
        let mut guard = self.inner.lock().unwrap();
        if guard.1.values().any(|p| p.handle == handle && p.id != id) {
            return Err(DirectoryError::HandleTaken);
        }
        let principal = guard.1.get_mut(&id).ok_or(DirectoryError::NotFound)?;
        principal.handle = handle;
        Ok(principal.clone())
    }

    async fn delete(&self, id: UserId) -> Result<bool, DirectoryError> {
        Ok(self.inner.lock().unwrap().1.remove(&id).is_some())
    }
}
