use thiserror::Error;

use clubhouse_core::DomainError;

/// Failure taxonomy at the authentication/authorization boundary.
///
/// `InvalidCredentials` and `Unauthenticated` deliberately carry no detail: callers
/// must not be able to tell which check failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Login failed: unknown handle or wrong secret.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired, mis-signed or stale-identity token.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Authenticated, but not the owner of the target resource.
    #[error("forbidden")]
    Forbidden,

    /// The target resource does not exist.
    #[error("not found")]
    NotFound,

    /// The requested handle is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(String),

    /// A collaborator (directory, hasher, codec) failed unexpectedly.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AuthError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
            DomainError::NotFound => Self::NotFound,
            DomainError::Conflict(msg) => Self::Conflict(msg),
            DomainError::InvariantViolation(msg) => Self::Internal(msg),
        }
    }
}
