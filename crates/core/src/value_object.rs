//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two value objects
/// with the same attributes are equal. Validation happens once at construction,
/// so holding one is proof the value is well-formed.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Handle(String);
///
/// impl ValueObject for Handle {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
