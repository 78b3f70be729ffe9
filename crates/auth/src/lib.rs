//! `clubhouse-auth`: token issuance, token verification and ownership checks.
//!
//! This crate is intentionally decoupled from HTTP and storage: the account
//! directory and the credential hasher are consumed through traits.

pub mod authorize;
pub mod claims;
pub mod codec;
pub mod config;
pub mod directory;
pub mod error;
pub mod hasher;
pub mod principal;
pub mod resolver;
pub mod service;

#[cfg(test)]
mod testing;

pub use authorize::{authorize_owned, authorize_owner_action};
pub use claims::{TokenClaims, TokenError, validate_claims};
pub use codec::{Hs256TokenCodec, IssuedToken, TokenCodec};
pub use config::{ConfigError, DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL, SigningSecret, TokenConfig};
pub use directory::{AccountDirectory, DirectoryError};
pub use error::AuthError;
pub use hasher::{Argon2Hasher, CredentialHasher, DECOY_SECRET_HASH, HashError};
pub use principal::{Handle, Principal, SecretHash, validate_secret};
pub use resolver::IdentityResolver;
pub use service::AuthService;
