use std::time::Duration;

use thiserror::Error;

/// Default access token lifetime.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("token signing key is missing or empty")]
    MissingSigningKey,

    #[error("token time-to-live must be greater than zero and at most one year")]
    InvalidTtl,
}

/// Symmetric HMAC key. `Debug` is redacted.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Immutable token settings, built once at startup and passed to the codec.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    signing_secret: SigningSecret,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenConfig {
    /// Build a config, refusing an empty signing key.
    ///
    /// There is no insecure fallback: callers must abort startup on error.
    pub fn new(
        signing_secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, ConfigError> {
        let signing_secret = signing_secret.into();
        if signing_secret.trim().is_empty() {
            return Err(ConfigError::MissingSigningKey);
        }
        if ttl.is_zero() || ttl > MAX_TOKEN_TTL {
            return Err(ConfigError::InvalidTtl);
        }
        Ok(Self {
            signing_secret: SigningSecret(signing_secret),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl,
        })
    }

    pub fn signing_secret(&self) -> &SigningSecret {
        &self.signing_secret
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
