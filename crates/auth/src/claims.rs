use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use clubhouse_core::UserId;

/// Tolerated clock skew, in seconds, for `iat` values slightly in the future.
pub const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Claim set carried by an access token.
///
/// The handle travels in the registered `sub` claim and the numeric user id in
/// the private `uid` claim. Both are checked when the token is resolved back to
/// a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject handle at issuance time.
    pub sub: String,

    /// Numeric user id. Kept as raw JSON so a missing or non-numeric value is a
    /// resolution failure rather than a decode failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<serde_json::Value>,

    /// Unique token identifier.
    pub jti: Uuid,

    pub iss: String,
    pub aud: String,

    /// Issued-at, Unix seconds.
    pub iat: i64,

    /// Expiration, Unix seconds.
    pub exp: i64,
}

impl TokenClaims {
    /// Numeric user id, if present and numeric (a JSON number or a numeric string).
    pub fn user_id(&self) -> Option<UserId> {
        match self.uid.as_ref()? {
            serde_json::Value::Number(n) => n.as_i64().map(UserId::new),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        unix_to_utc(self.iat)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        unix_to_utc(self.exp)
    }
}

fn unix_to_utc(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("token issuer does not match")]
    IssuerMismatch,

    #[error("token audience does not match")]
    AudienceMismatch,

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Deterministically validate the time window of already-verified claims.
///
/// Validity is a pure function of the claims and `now`; nothing is stored.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.exp <= claims.iat {
        return Err(TokenError::InvalidTimeWindow);
    }
    if now + Duration::seconds(MAX_CLOCK_SKEW_SECS) < claims.issued_at() {
        return Err(TokenError::NotYetValid);
    }
    if now >= claims.expires_at() {
        return Err(TokenError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims_at(iat: DateTime<Utc>, ttl: Duration) -> TokenClaims {
        TokenClaims {
            sub: "alice01".to_string(),
            uid: Some(json!(1)),
            jti: Uuid::now_v7(),
            iss: "clubhouse".to_string(),
            aud: "clubhouse-api".to_string(),
            iat: iat.timestamp(),
            exp: (iat + ttl).timestamp(),
        }
    }

    #[test]
    fn accepts_claims_inside_window() {
        let now = Utc::now();
        let claims = claims_at(now, Duration::hours(1));
        assert_eq!(validate_claims(&claims, now), Ok(()));
        assert_eq!(validate_claims(&claims, now + Duration::minutes(59)), Ok(()));
    }

    #[test]
    fn rejects_expired_claims() {
        let now = Utc::now();
        let claims = claims_at(now, Duration::hours(1));
        assert_eq!(
            validate_claims(&claims, now + Duration::hours(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn rejects_future_issued_claims_beyond_skew() {
        let now = Utc::now();
        let claims = claims_at(now + Duration::minutes(5), Duration::hours(1));
        assert_eq!(validate_claims(&claims, now), Err(TokenError::NotYetValid));

        let claims = claims_at(now + Duration::seconds(30), Duration::hours(1));
        assert_eq!(validate_claims(&claims, now), Ok(()));
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc::now();
        let mut claims = claims_at(now, Duration::hours(1));
        claims.exp = claims.iat;
        assert_eq!(validate_claims(&claims, now), Err(TokenError::InvalidTimeWindow));
    }

    #[test]
    fn user_id_accepts_numbers_and_numeric_strings_only() {
        let mut claims = claims_at(Utc::now(), Duration::hours(1));
        assert_eq!(claims.user_id(), Some(UserId::new(1)));

        claims.uid = Some(json!("17"));
        assert_eq!(claims.user_id(), Some(UserId::new(17)));

        claims.uid = Some(json!("seventeen"));
        assert_eq!(claims.user_id(), None);

        claims.uid = Some(json!(1.5));
        assert_eq!(claims.user_id(), None);

        claims.uid = None;
        assert_eq!(claims.user_id(), None);
    }
}
