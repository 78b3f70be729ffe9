//! Signed, time-bounded identity assertions (HS256 JWTs).

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use uuid::Uuid;

use crate::claims::{TokenClaims, TokenError, validate_claims};
use crate::config::TokenConfig;
use crate::principal::Principal;

/// A freshly issued token and the metadata a client may want alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub token_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Produce and consume signed identity assertions.
///
/// Both directions are pure: no storage is touched and `now` is supplied by the
/// caller so validity can be checked deterministically.
pub trait TokenCodec: Send + Sync {
    fn issue(&self, principal: &Principal, now: DateTime<Utc>) -> Result<IssuedToken, TokenError>;

    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError>;
}

/// HMAC-SHA-256 token codec.
pub struct Hs256TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    ttl_secs: i64,
}

impl Hs256TokenCodec {
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.signing_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer().to_string(),
            audience: config.audience().to_string(),
            ttl_secs: i64::try_from(config.ttl().as_secs()).unwrap_or(i64::MAX),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        // Time checks happen in `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation
    }
}

impl TokenCodec for Hs256TokenCodec {
    fn issue(&self, principal: &Principal, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let iat = now.timestamp();
        let claims = TokenClaims {
            sub: principal.handle.as_str().to_string(),
            uid: Some(serde_json::Value::from(principal.id.get())),
            jti: Uuid::now_v7(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat,
            exp: iat.saturating_add(self.ttl_secs),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(IssuedToken {
            token,
            token_id: claims.jti,
            expires_at: claims.expires_at(),
        })
    }

    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| map_jwt_error(e.kind()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

fn map_jwt_error(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        ErrorKind::InvalidIssuer => TokenError::IssuerMismatch,
        ErrorKind::InvalidAudience => TokenError::AudienceMismatch,
        _ => TokenError::Malformed,
    }
}
