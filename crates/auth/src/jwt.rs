//! HS256 token issuing and validation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::{JwtClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JwtError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token encoding failed: {0}")]
    Encoding(String),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verifies a bearer token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError>;
}

/// HS256 validator with a shared secret.
///
/// Time-window checks are done by [`validate_claims`] against the caller's
/// clock, so the library's own `exp` handling is switched off.
#[derive(Clone)]
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.key, &self.validation)
            .map_err(|e| JwtError::Malformed(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

/// HS256 token issuer with a shared secret.
#[derive(Clone)]
pub struct Hs256JwtIssuer {
    key: EncodingKey,
}

impl Hs256JwtIssuer {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_ref()),
        }
    }

    pub fn issue(&self, claims: &JwtClaims) -> Result<String, JwtError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.key)
            .map_err(|e| JwtError::Encoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use loanportal_core::Role;

    fn claims(now: DateTime<Utc>) -> JwtClaims {
        JwtClaims {
            sub: "u-7".parse().unwrap(),
            email: "root@example.com".to_string(),
            name: "Root".to_string(),
            role: Role::Superadmin,
            issued_at: now,
            expires_at: now + Duration::minutes(10),
        }
    }

    #[test]
    fn issued_token_validates_with_same_secret() {
        let now = Utc::now();
        let token = Hs256JwtIssuer::new("s3cret").issue(&claims(now)).unwrap();
        let decoded = Hs256JwtValidator::new("s3cret").validate(&token, now).unwrap();
        assert_eq!(decoded, claims(now));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let now = Utc::now();
        let token = Hs256JwtIssuer::new("s3cret").issue(&claims(now)).unwrap();
        let err = Hs256JwtValidator::new("other").validate(&token, now).unwrap_err();
        assert!(matches!(err, JwtError::Malformed(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let token = Hs256JwtIssuer::new("s3cret").issue(&claims(now)).unwrap();
        let later = now + Duration::minutes(11);
        let err = Hs256JwtValidator::new("s3cret").validate(&token, later).unwrap_err();
        assert_eq!(err, JwtError::Claims(TokenValidationError::Expired));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = Hs256JwtValidator::new("s3cret")
            .validate("not-a-token", Utc::now())
            .unwrap_err();
        assert!(matches!(err, JwtError::Malformed(_)));
    }
}
