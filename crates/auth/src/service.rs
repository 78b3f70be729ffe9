//! The authentication contract exposed to the request layer.

use std::sync::Arc;

use chrono::Utc;

use clubhouse_core::OwnedResource;

use crate::authorize::authorize_owner_action;
use crate::codec::{IssuedToken, TokenCodec};
use crate::directory::{AccountDirectory, DirectoryError};
use crate::error::AuthError;
use crate::hasher::CredentialHasher;
use crate::principal::{Handle, Principal, validate_secret};
use crate::resolver::{IdentityResolver, internal};

/// Login, bearer authentication, ownership checks and the account lifecycle.
#[derive(Clone)]
pub struct AuthService {
    resolver: IdentityResolver,
}

impl AuthService {
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        hasher: Arc<dyn CredentialHasher>,
        codec: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            resolver: IdentityResolver::new(directory, hasher, codec),
        }
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// Authenticate by handle/secret and issue a token.
    pub async fn login(&self, handle: &str, secret: &str) -> Result<IssuedToken, AuthError> {
        let principal = match self.resolver.authenticate_by_credentials(handle, secret).await {
            Ok(p) => p,
            Err(e) => {
                if e == AuthError::InvalidCredentials {
                    tracing::warn!("login failed");
                }
                return Err(e);
            }
        };

        let issued = self.resolver.codec().issue(&principal, Utc::now()).map_err(|e| {
            tracing::error!(error = %e, "token issuance failed");
            AuthError::Internal(e.to_string())
        })?;

        tracing::info!(user_id = %principal.id, token_id = %issued.token_id, "login succeeded");
        Ok(issued)
    }

    /// Resolve a bearer token to its principal.
    pub async fn authenticate(&self, bearer_token: &str) -> Result<Principal, AuthError> {
        self.resolver
            .resolve_from_token(bearer_token, Utc::now())
            .await
            .inspect_err(|e| {
                if *e == AuthError::Unauthenticated {
                    tracing::warn!("bearer token rejected");
                }
            })
    }

    pub fn authorize_owner<R>(&self, principal: &Principal, resource: &R) -> Result<(), AuthError>
    where
        R: OwnedResource + ?Sized,
    {
        authorize_owner_action(principal, resource)
    }

    /// Create an account. The secret is hashed before it reaches the directory.
    ///
    /// Uniqueness is enforced by the directory's atomic insert; the advisory
    /// existence check only short-circuits the (expensive) hash.
    pub async fn register(&self, handle: Handle, secret: &str) -> Result<Principal, AuthError> {
        validate_secret(secret)?;

        let directory = self.resolver.directory();
        if directory.exists_by_handle(handle.as_str()).await.map_err(internal)? {
            return Err(taken());
        }

        let secret_hash = self.resolver.hash_secret(secret).await?;

        let principal = directory
            .insert(handle, secret_hash)
            .await
            .map_err(map_write_error)?;

        tracing::info!(user_id = %principal.id, "account registered");
        Ok(principal)
    }

    /// Change the caller's handle. Tokens bound to the old handle stop resolving.
    pub async fn change_handle(
        &self,
        principal: &Principal,
        new_handle: Handle,
    ) -> Result<Principal, AuthError> {
        if principal.handle == new_handle {
            return Ok(principal.clone());
        }

        let updated = self
            .resolver
            .directory()
            .update_handle(principal.id, new_handle)
            .await
            .map_err(map_write_error)?;

        tracing::info!(user_id = %updated.id, "handle changed");
        Ok(updated)
    }

    /// Delete the caller's account. Owned resources are the caller's to cascade.
    pub async fn delete_account(&self, principal: &Principal) -> Result<(), AuthError> {
        let removed = self
            .resolver
            .directory()
            .delete(principal.id)
            .await
            .map_err(internal)?;
        if !removed {
            return Err(AuthError::NotFound);
        }
        tracing::info!(user_id = %principal.id, "account deleted");
        Ok(())
    }
}

fn taken() -> AuthError {
    AuthError::Conflict("username is already taken".to_string())
}

fn map_write_error(err: DirectoryError) -> AuthError {
    match err {
        DirectoryError::HandleTaken => taken(),
        DirectoryError::NotFound => AuthError::NotFound,
        other => internal(other),
    }
}
