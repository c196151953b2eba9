use serde::{Deserialize, Serialize};

use super::jwt::TokenError;

/// Verified token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: i64,      // user ID
    pub email: String, // email at issue time
    pub exp: i64,      // expires at (unix timestamp)
}

/// Wire form written into a token.
#[derive(Debug, Serialize)]
pub(super) struct SignedClaims<'a> {
    pub sub: i64,
    pub email: &'a str,
    pub exp: i64,
}

/// Wire form read back from a verified token. `sub` stays untyped until
/// `into_claims` converts it.
#[derive(Debug, Deserialize)]
pub(super) struct RawClaims {
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
    pub email: String,
    pub exp: i64,
}

impl RawClaims {
    pub(super) fn into_claims(self) -> Result<Claims, TokenError> {
        let sub = self
            .sub
            .as_ref()
            .and_then(subject_id)
            .ok_or(TokenError::InvalidSubject)?;
        Ok(Claims {
            sub,
            email: self.email,
            exp: self.exp,
        })
    }
}

/// A JSON number that converts to `i64` without loss is a subject id.
/// `2.0` qualifies; `1.5`, strings and out-of-range values do not.
fn subject_id(value: &serde_json::Value) -> Option<i64> {
    // 2^63; `i64::MAX as f64` rounds up to this
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .filter(|f| *f >= -I64_BOUND && *f < I64_BOUND)
                .map(|f| f as i64)
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(sub: serde_json::Value) -> RawClaims {
        serde_json::from_value(json!({ "sub": sub, "email": "a@example.com", "exp": 1 })).unwrap()
    }

    #[test]
    fn integer_subject_converts() {
        let claims = raw(json!(42)).into_claims().unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "a@example.com");
    }

    #[test]
    fn integral_float_subject_converts() {
        assert_eq!(raw(json!(2.0)).into_claims().unwrap().sub, 2);
        assert_eq!(raw(json!(-7.0)).into_claims().unwrap().sub, -7);
    }

    #[test]
    fn non_integer_subjects_are_rejected() {
        for sub in [json!(1.5), json!(1e300), json!("3"), json!(null), json!(u64::MAX)] {
            assert_eq!(
                raw(sub.clone()).into_claims().unwrap_err(),
                TokenError::InvalidSubject,
                "sub = {sub}"
            );
        }
    }

    #[test]
    fn missing_subject_is_rejected() {
        let raw: RawClaims =
            serde_json::from_value(json!({ "email": "a@example.com", "exp": 1 })).unwrap();
        assert_eq!(raw.into_claims().unwrap_err(), TokenError::InvalidSubject);
    }
}
