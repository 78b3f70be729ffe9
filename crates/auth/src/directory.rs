//! Account directory: the persistent store of principals.

use async_trait::async_trait;
use thiserror::Error;

use clubhouse_core::UserId;

use crate::principal::{Handle, Principal, SecretHash};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("handle is already taken")]
    HandleTaken,

    #[error("principal not found")]
    NotFound,

    #[error("directory backend failure: {0}")]
    Backend(String),
}

/// Principal storage keyed by id and by unique handle.
///
/// Implementations must enforce handle uniqueness atomically at write time
/// (`insert` and `update_handle`); a prior `exists_by_handle` check is advisory.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Principal>, DirectoryError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<Principal>, DirectoryError>;

    async fn exists_by_handle(&self, handle: &str) -> Result<bool, DirectoryError>;

    /// Persist a new principal, assigning its id.
    async fn insert(&self, handle: Handle, secret_hash: SecretHash) -> Result<Principal, DirectoryError>;

    async fn update_handle(&self, id: UserId, handle: Handle) -> Result<Principal, DirectoryError>;

    /// Remove a principal. Returns `false` if it did not exist.
    async fn delete(&self, id: UserId) -> Result<bool, DirectoryError>;
}
