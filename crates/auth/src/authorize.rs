//! Ownership-based authorization for owned resources.
//!
//! - No IO
//! - No panics
//! - Pure policy check

use clubhouse_core::OwnedResource;

use crate::error::AuthError;
use crate::principal::Principal;

/// Allow iff the principal owns the resource.
pub fn authorize_owner_action<R>(principal: &Principal, resource: &R) -> Result<(), AuthError>
where
    R: OwnedResource + ?Sized,
{
    if principal.id == resource.owner_id() {
        Ok(())
    } else {
        tracing::debug!(
            user_id = %principal.id,
            owner_id = %resource.owner_id(),
            "ownership check failed"
        );
        Err(AuthError::Forbidden)
    }
}

/// Existence check, then ownership check.
///
/// This is the single ordering applied to every owned resource type: a missing
/// resource is `NotFound`, someone else's resource is `Forbidden`.
pub fn authorize_owned<R>(principal: &Principal, resource: Option<R>) -> Result<R, AuthError>
where
    R: OwnedResource,
{
    let resource = resource.ok_or(AuthError::NotFound)?;
    authorize_owner_action(principal, &resource)?;
    Ok(resource)
}
