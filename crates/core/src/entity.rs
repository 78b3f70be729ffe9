//! Entity trait: identity + continuity across state changes.

use crate::id::UserId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// An entity owned by exactly one user.
///
/// Every mutating operation on an owned resource must confirm that the caller
/// is the owner before it proceeds.
pub trait OwnedResource: Entity {
    /// The user that created (and therefore owns) this resource.
    fn owner_id(&self) -> UserId;
}
