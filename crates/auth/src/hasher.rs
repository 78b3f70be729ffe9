//! One-way credential hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

use crate::principal::SecretHash;

/// Well-formed Argon2id PHC string that matches no secret.
///
/// Verified against when a login names an unknown handle, so that path costs
/// the same as a wrong secret for a real account. Parameters match
/// `Argon2::default()`.
pub const DECOY_SECRET_HASH: &str = concat!(
    "$argon2id$v=19$m=19456,t=2,p=1$",
    "AAAAAAAAAAAAAAAAAAAAAA",
    "$",
    "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Hash + verify capability for user secrets.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<SecretHash, HashError>;

    /// `false` on mismatch, and also when `hash` cannot be parsed.
    fn verify(&self, plaintext: &str, hash: &SecretHash) -> bool;
}

/// Argon2id hasher with a random per-secret salt (PHC string output).
#[derive(Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<SecretHash, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| HashError::Hashing(e.to_string()))?;
        Ok(SecretHash::new(hash.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &SecretHash) -> bool {
        let Ok(parsed) = PasswordHash::new(hash.as_str()) else {
            tracing::warn!("stored secret hash is not a valid PHC string");
            return false;
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("Passw0rd!").unwrap();

        assert_ne!(hash.as_str(), "Passw0rd!");
        assert!(hash.as_str().starts_with("$argon2"));
        assert!(hasher.verify("Passw0rd!", &hash));
        assert!(!hasher.verify("wrong", &hash));
    }

    #[test]
    fn same_secret_hashes_differently() {
        let hasher = Argon2Hasher::new();
        let a = hasher.hash("Passw0rd!").unwrap();
        let b = hasher.hash("Passw0rd!").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn decoy_hash_parses_with_default_params_and_never_verifies() {
        let parsed = PasswordHash::new(DECOY_SECRET_HASH).unwrap();
        let params = argon2::Params::try_from(&parsed).unwrap();
        let defaults = argon2::Params::default();
        assert_eq!(params.m_cost(), defaults.m_cost());
        assert_eq!(params.t_cost(), defaults.t_cost());
        assert_eq!(params.p_cost(), defaults.p_cost());

        let hasher = Argon2Hasher::new();
        for secret in ["", "Passw0rd!", DECOY_SECRET_HASH] {
            assert!(!hasher.verify(secret, &SecretHash::new(DECOY_SECRET_HASH)));
        }
    }

    #[test]
    fn unparseable_hash_never_verifies() {
        let hasher = Argon2Hasher::new();
        assert!(!hasher.verify("Passw0rd!", &SecretHash::new("Passw0rd!")));
    }
}
