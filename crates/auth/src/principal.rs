use serde::{Deserialize, Serialize};

use clubhouse_core::{DomainError, DomainResult, UserId, ValueObject};

/// Unique, user-chosen login name.
///
/// 4–30 ASCII letters or digits. Comparison is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    pub const MIN_LEN: usize = 4;
    pub const MAX_LEN: usize = 30;

    pub fn parse(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        let len = raw.chars().count();
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&len) {
            return Err(DomainError::validation(format!(
                "username must be between {} and {} characters",
                Self::MIN_LEN,
                Self::MAX_LEN
            )));
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::validation(
                "username can only contain letters and numbers",
            ));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Handle {}

impl core::fmt::Display for Handle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Handle {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Handle> for String {
    fn from(value: Handle) -> Self {
        value.0
    }
}

/// One-way hash of a user's secret, as produced by a [`crate::CredentialHasher`].
///
/// Never the plaintext. `Debug` output is redacted so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash(String);

impl SecretHash {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SecretHash(<redacted>)")
    }
}

/// Accepted secret length at registration.
pub const SECRET_MIN_LEN: usize = 6;
pub const SECRET_MAX_LEN: usize = 128;

pub fn validate_secret(secret: &str) -> DomainResult<()> {
    let len = secret.chars().count();
    if !(SECRET_MIN_LEN..=SECRET_MAX_LEN).contains(&len) {
        return Err(DomainError::validation(format!(
            "password must be between {SECRET_MIN_LEN} and {SECRET_MAX_LEN} characters"
        )));
    }
    Ok(())
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub handle: Handle,
    pub secret_hash: SecretHash,
}
