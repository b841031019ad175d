//! # Signed access tokens
//!
//! HS256 JWTs binding a user id to an issue and expiry time.
//!
//! A token is valid while `now < exp` and expired from `exp` on. There is no
//! server-side registry, so a token cannot be revoked before it expires.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use models::RecordId;
use serde::{Deserialize, Serialize};

use super::errors::AuthError;
use crate::errors::ServiceError;

pub const ISSUER: &str = "chirpy";

/// Longest lifetime a token can get.
pub fn default_token_ttl() -> Duration {
    Duration::hours(24)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iss: String,
    /// User id, as a decimal string
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Requested lifetime, capped at `default`. Absent or non-positive requests
/// get `default`.
pub fn effective_ttl(requested: Option<Duration>, default: Duration) -> Duration {
    match requested {
        Some(ttl) if ttl > Duration::zero() => ttl.min(default),
        _ => default,
    }
}

/// Caller-supplied lifetime in seconds. Values too large for a `Duration`
/// saturate, so they still clamp to the default instead of failing.
pub fn requested_ttl_secs(secs: Option<i64>) -> Option<Duration> {
    secs.map(|s| Duration::try_seconds(s).unwrap_or(if s > 0 { Duration::MAX } else { Duration::MIN }))
}

pub fn issue_token(subject: RecordId, secret: &[u8], requested_ttl: Option<Duration>) -> Result<String, AuthError> {
    issue_token_at(subject, secret, requested_ttl, default_token_ttl(), Utc::now())
}

pub fn issue_token_at(
    subject: RecordId,
    secret: &[u8],
    requested_ttl: Option<Duration>,
    default_ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let ttl = effective_ttl(requested_ttl, default_ttl);
    let iat = now.timestamp();
    let exp = iat
        .checked_add(ttl.num_seconds())
        .ok_or_else(|| AuthError::TokenError(format!("expiry overflows: iat={iat} ttl={ttl}")))?;
    let claims = TokenClaims {
        iss: ISSUER.to_string(),
        sub: subject.to_string(),
        iat,
        exp,
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Subject of a valid token.
pub fn validate_token(token: &str, secret: &[u8]) -> Result<String, AuthError> {
    validate_token_at(token, secret, Utc::now())
}

pub fn validate_token_at(token: &str, secret: &[u8], now: DateTime<Utc>) -> Result<String, AuthError> {
    decode_claims_at(token, secret, now).map(|claims| claims.sub)
}

/// Verify signature and issuer, then expiry against `now` with no leeway.
pub fn decode_claims_at(token: &str, secret: &[u8], now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // exp is compared below against the caller's clock
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(secret), &validation).map_err(|e| {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    })?;

    if now.timestamp() >= data.claims.exp {
        return Err(AuthError::TokenExpired);
    }
    Ok(data.claims)
}

/// Subject string to user id. Zero and non-numbers are rejected.
pub fn parse_subject(subject: &str) -> Result<RecordId, ServiceError> {
    match subject.parse::<RecordId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ServiceError::Validation(format!("invalid token subject: {subject:?}"))),
    }
}

/// Signing secret and lifetime cap, set once at startup and only read after.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    default_ttl: Duration,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl TokenConfig {
    pub fn new(secret: impl Into<Vec<u8>>, default_ttl: Duration) -> Self {
        Self { secret: secret.into(), default_ttl }
    }

    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self::new(secret, default_token_ttl())
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn issue(&self, subject: RecordId, requested_ttl: Option<Duration>) -> Result<String, AuthError> {
        issue_token_at(subject, &self.secret, requested_ttl, self.default_ttl, Utc::now())
    }

    pub fn validate(&self, token: &str) -> Result<String, AuthError> {
        validate_token(token, &self.secret)
    }

    pub fn decode_claims(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode_claims_at(token, &self.secret, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_for_testing_only";

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn round_trip_returns_subject() {
        let token = issue_token(42, SECRET, Some(Duration::seconds(60))).unwrap();
        assert_eq!(validate_token(&token, SECRET).unwrap(), "42");
    }

    #[test]
    fn long_request_is_clamped_to_default() {
        let token = issue_token_at(7, SECRET, Some(Duration::seconds(1_000_000)), default_token_ttl(), t0()).unwrap();
        let claims = decode_claims_at(&token, SECRET, t0()).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert_eq!(claims.iat, t0().timestamp());
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn shorter_request_is_honoured() {
        let token = issue_token_at(7, SECRET, Some(Duration::seconds(30)), default_token_ttl(), t0()).unwrap();
        let claims = decode_claims_at(&token, SECRET, t0()).unwrap();
        assert_eq!(claims.exp - claims.iat, 30);
    }

    #[test]
    fn absent_or_non_positive_request_gets_default() {
        let d = default_token_ttl();
        assert_eq!(effective_ttl(None, d), d);
        assert_eq!(effective_ttl(Some(Duration::zero()), d), d);
        assert_eq!(effective_ttl(Some(Duration::seconds(-5)), d), d);
        assert_eq!(effective_ttl(Some(Duration::seconds(5)), d), Duration::seconds(5));
    }

    #[test]
    fn requested_seconds_saturate() {
        assert_eq!(requested_ttl_secs(None), None);
        assert_eq!(requested_ttl_secs(Some(90)), Some(Duration::seconds(90)));
        assert_eq!(requested_ttl_secs(Some(i64::MAX)), Some(Duration::MAX));
        assert_eq!(requested_ttl_secs(Some(i64::MIN)), Some(Duration::MIN));
        assert_eq!(effective_ttl(requested_ttl_secs(Some(i64::MAX)), default_token_ttl()), default_token_ttl());
    }

    #[test]
    fn huge_cap_issues_without_overflow() {
        let token = issue_token_at(1, SECRET, None, Duration::MAX, t0()).unwrap();
        let claims = decode_claims_at(&token, SECRET, t0()).unwrap();
        assert_eq!(claims.exp - claims.iat, Duration::MAX.num_seconds());
    }

    #[test]
    fn expires_exactly_at_exp() {
        let token = issue_token_at(1, SECRET, Some(Duration::seconds(10)), default_token_ttl(), t0()).unwrap();
        assert!(validate_token_at(&token, SECRET, t0() + Duration::seconds(9)).is_ok());
        assert_eq!(validate_token_at(&token, SECRET, t0() + Duration::seconds(10)), Err(AuthError::TokenExpired));
        assert_eq!(validate_token_at(&token, SECRET, t0() + Duration::days(3)), Err(AuthError::TokenExpired));
    }

    #[test]
    fn old_token_is_expired_against_real_clock() {
        let issued = Utc::now() - Duration::hours(48);
        let token = issue_token_at(1, SECRET, None, default_token_ttl(), issued).unwrap();
        assert_eq!(validate_token(&token, SECRET), Err(AuthError::TokenExpired));
    }

    #[test]
    fn wrong_secret_or_tampering_is_invalid() {
        let token = issue_token(1, SECRET, None).unwrap();
        assert_eq!(validate_token(&token, b"another secret"), Err(AuthError::InvalidToken));

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[2] = parts[2].chars().rev().collect();
        assert_eq!(validate_token(&parts.join("."), SECRET), Err(AuthError::InvalidToken));

        assert_eq!(validate_token("not-a-token", SECRET), Err(AuthError::InvalidToken));
    }

    #[test]
    fn foreign_issuer_is_invalid() {
        let claims = TokenClaims { iss: "someone-else".into(), sub: "1".into(), iat: Utc::now().timestamp(), exp: Utc::now().timestamp() + 60 };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
        assert_eq!(validate_token(&token, SECRET), Err(AuthError::InvalidToken));
    }

    #[test]
    fn subject_parsing() {
        assert_eq!(parse_subject("12").unwrap(), 12);
        assert!(matches!(parse_subject("0"), Err(ServiceError::Validation(_))));
        assert!(matches!(parse_subject("abc"), Err(ServiceError::Validation(_))));
        assert!(matches!(parse_subject("-3"), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn config_uses_its_own_cap() {
        let cfg = TokenConfig::new(SECRET, Duration::minutes(5));
        let token = cfg.issue(3, Some(Duration::hours(1))).unwrap();
        let claims = cfg.decode_claims(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 300);
        assert_eq!(cfg.validate(&token).unwrap(), "3");
        assert!(!format!("{cfg:?}").contains("test_secret"));
    }
}
