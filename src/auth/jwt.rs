use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::OffsetDateTime;
use tracing::{debug, error};

use super::claims::{Claims, RawClaims, SignedClaims};
use crate::{config::JwtConfig, state::AppState};

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Malformed, wrong algorithm, bad signature or expired. Deliberately
    /// does not say which.
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid subject")]
    InvalidSubject,
    #[error("token signing failed")]
    Signing,
}

/// Issues and verifies HS256 tokens carrying `{sub, email, exp}`.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for TokenCodec {
    fn from_ref(state: &AppState) -> Self {
        state.codec.clone()
    }
}

impl TokenCodec {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self::new(&cfg.secret, cfg.ttl())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, TokenError> {
        self.issue_with_ttl(user_id, email, self.ttl)
    }

    pub fn issue_with_ttl(
        &self,
        user_id: i64,
        email: &str,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let exp = time::Duration::try_from(ttl)
            .ok()
            .and_then(|ttl| OffsetDateTime::now_utc().checked_add(ttl))
            .ok_or_else(|| {
                error!(ttl_secs = ttl.as_secs(), "jwt expiry out of range");
                TokenError::Signing
            })?;
        let claims = SignedClaims {
            sub: user_id,
            email,
            exp: exp.unix_timestamp(),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding).map_err(|e| {
            error!(error = %e, "jwt encode failed");
            TokenError::Signing
        })?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        // Header algorithm, signature and expiry are all checked inside
        // `decode` before the payload is handed back.
        let data = decode::<RawClaims>(token, &self.decoding, &validation()).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            TokenError::InvalidToken
        })?;
        let claims = data.claims.into_claims()?;
        debug!(user_id = claims.sub, "jwt verified");
        Ok(claims)
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(ALGORITHM);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.validate_aud = false;
    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "dev-secret";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, Duration::from_secs(3600))
    }

    fn sign_raw(payload: serde_json::Value, alg: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(alg),
            &payload,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn now() -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }

    #[test]
    fn issue_and_parse_roundtrip() {
        let codec = codec();
        let before = now();
        let token = codec.issue(17, "jane@example.com").expect("issue");
        let claims = codec.parse(&token).expect("parse");

        assert_eq!(claims.sub, 17);
        assert_eq!(claims.email, "jane@example.com");
        assert!(claims.exp >= before + 3600);
        assert!(claims.exp <= now() + 3600);
    }

    #[test]
    fn explicit_ttl_overrides_default() {
        let codec = codec();
        let token = codec
            .issue_with_ttl(1, "a@example.com", Duration::from_secs(60))
            .unwrap();
        let claims = codec.parse(&token).unwrap();
        assert!(claims.exp <= now() + 60);
    }

    #[test]
    fn expired_token_is_invalid() {
        let token = sign_raw(
            json!({ "sub": 1, "email": "a@example.com", "exp": now() - 10 }),
            Algorithm::HS256,
            SECRET,
        );
        assert_eq!(codec().parse(&token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let other = TokenCodec::new("another-secret", Duration::from_secs(3600));
        let token = other.issue(1, "a@example.com").unwrap();
        assert_eq!(codec().parse(&token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn other_algorithm_is_invalid_even_with_same_secret() {
        let token = sign_raw(
            json!({ "sub": 1, "email": "a@example.com", "exp": now() + 600 }),
            Algorithm::HS512,
            SECRET,
        );
        assert_eq!(codec().parse(&token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn unsigned_none_token_is_invalid() {
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.\
                     eyJzdWIiOjEsImVtYWlsIjoiYUBleGFtcGxlLmNvbSIsImV4cCI6NDEwMjQ0NDgwMH0.";
        assert_eq!(codec().parse(token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn tampered_or_garbage_token_is_invalid() {
        let codec = codec();
        let token = codec.issue(1, "a@example.com").unwrap();
        let mut tampered = token.clone();
        tampered.push('x');

        assert_eq!(codec.parse(&tampered).unwrap_err(), TokenError::InvalidToken);
        assert_eq!(codec.parse("not.a.jwt").unwrap_err(), TokenError::InvalidToken);
        assert_eq!(codec.parse("").unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn missing_expiry_is_invalid() {
        let token = sign_raw(
            json!({ "sub": 1, "email": "a@example.com" }),
            Algorithm::HS256,
            SECRET,
        );
        assert_eq!(codec().parse(&token).unwrap_err(), TokenError::InvalidToken);
    }

    #[test]
    fn oversized_ttl_fails_instead_of_panicking() {
        let codec = TokenCodec::new(SECRET, Duration::from_secs(60 * 999_999_999_999));
        assert_eq!(
            codec.issue(1, "a@example.com").unwrap_err(),
            TokenError::Signing
        );
        assert_eq!(
            self::codec()
                .issue_with_ttl(1, "a@example.com", Duration::MAX)
                .unwrap_err(),
            TokenError::Signing
        );
    }

    #[test]
    fn integral_float_subject_is_accepted() {
        let token = sign_raw(
            json!({ "sub": 2.0, "email": "a@example.com", "exp": now() + 600 }),
            Algorithm::HS256,
            SECRET,
        );
        assert_eq!(codec().parse(&token).unwrap().sub, 2);
    }

    #[test]
    fn fractional_subject_is_invalid_subject() {
        let token = sign_raw(
            json!({ "sub": 1.5, "email": "a@example.com", "exp": now() + 600 }),
            Algorithm::HS256,
            SECRET,
        );
        assert_eq!(codec().parse(&token).unwrap_err(), TokenError::InvalidSubject);
    }

    #[test]
    fn string_subject_is_invalid_subject() {
        let token = sign_raw(
            json!({ "sub": "1", "email": "a@example.com", "exp": now() + 600 }),
            Algorithm::HS256,
            SECRET,
        );
        assert_eq!(codec().parse(&token).unwrap_err(), TokenError::InvalidSubject);
    }
}
