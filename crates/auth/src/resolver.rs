//! Identity resolution: credentials or bearer token → trusted principal.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::codec::TokenCodec;
use crate::directory::{AccountDirectory, DirectoryError};
use crate::error::AuthError;
use crate::hasher::{CredentialHasher, DECOY_SECRET_HASH};
use crate::principal::{Principal, SecretHash};

#[derive(Clone)]
pub struct IdentityResolver {
    directory: Arc<dyn AccountDirectory>,
    hasher: Arc<dyn CredentialHasher>,
    codec: Arc<dyn TokenCodec>,
}

impl IdentityResolver {
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        hasher: Arc<dyn CredentialHasher>,
        codec: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            directory,
            hasher,
            codec,
        }
    }

    /// Check a handle/secret pair against the directory.
    ///
    /// An unknown handle and a wrong secret both yield `InvalidCredentials`,
    /// and both pay for one hash verification. No token is issued here.
    pub async fn authenticate_by_credentials(
        &self,
        handle: &str,
        secret: &str,
    ) -> Result<Principal, AuthError> {
        let principal = self
            .directory
            .find_by_handle(handle)
            .await
            .map_err(internal)?;

        let Some(principal) = principal else {
            self.verify_secret(secret, SecretHash::new(DECOY_SECRET_HASH))
                .await?;
            tracing::debug!("login rejected: unknown handle");
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .verify_secret(secret, principal.secret_hash.clone())
            .await?
        {
            tracing::debug!(user_id = %principal.id, "login rejected: secret mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(principal)
    }

    /// Resolve a bearer token to the principal it was issued for.
    ///
    /// Every token failure maps to `Unauthenticated`. The token's handle claim
    /// must still match the principal's current handle, so a handle change
    /// invalidates tokens issued before it.
    pub async fn resolve_from_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Principal, AuthError> {
        let claims = self.codec.decode(token, now).map_err(|e| {
            tracing::debug!(reason = %e, "token rejected");
            AuthError::Unauthenticated
        })?;

        let Some(user_id) = claims.user_id() else {
            tracing::debug!("token rejected: missing or non-numeric user id claim");
            return Err(AuthError::Unauthenticated);
        };

        let principal = self
            .directory
            .find_by_id(user_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| {
                tracing::debug!(%user_id, "token rejected: principal no longer exists");
                AuthError::Unauthenticated
            })?;

        if principal.handle.as_str() != claims.sub {
            tracing::debug!(%user_id, "token rejected: stale handle binding");
            return Err(AuthError::Unauthenticated);
        }

        Ok(principal)
    }

    /// Hashing runs on the blocking pool, never on an async worker.
    pub(crate) async fn verify_secret(
        &self,
        secret: &str,
        hash: SecretHash,
    ) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        let secret = secret.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&secret, &hash))
            .await
            .map_err(join_failed)
    }

    pub(crate) async fn hash_secret(&self, secret: &str) -> Result<SecretHash, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        let secret = secret.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(join_failed)?
            .map_err(|e| {
                tracing::error!(error = %e, "secret hashing failed");
                AuthError::Internal(e.to_string())
            })
    }

    pub(crate) fn directory(&self) -> &Arc<dyn AccountDirectory> {
        &self.directory
    }

    pub(crate) fn codec(&self) -> &Arc<dyn TokenCodec> {
        &self.codec
    }
}

fn join_failed(err: tokio::task::JoinError) -> AuthError {
    tracing::error!(error = %err, "credential hashing task failed");
    AuthError::Internal(err.to_string())
}

pub(crate) fn internal(err: DirectoryError) -> AuthError {
    tracing::error!(error = %err, "account directory failure");
    AuthError::Internal(err.to_string())
}
