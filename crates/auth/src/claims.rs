use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use loanportal_core::{Role, User, UserId};

/// JWT claims model (transport-agnostic).
///
/// Carries the full user identity so loan endpoints can authorize without a
/// directory lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject / user identifier.
    pub sub: UserId,

    pub email: String,

    pub name: String,

    /// Role granted at login; immutable for the token's lifetime.
    pub role: Role,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl JwtClaims {
    pub fn for_user(user: &User, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            issued_at,
            expires_at,
        }
    }

    pub fn user(&self) -> User {
        User {
            id: self.sub.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate JWT claims.
///
/// Note: this validates the *claims* only. Signature verification lives in
/// [`crate::jwt`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(issued_at: DateTime<Utc>, ttl: Duration) -> JwtClaims {
        JwtClaims {
            sub: "u-1".parse().unwrap(),
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            role: Role::Admin,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[test]
    fn valid_window_passes() {
        let now = Utc::now();
        assert_eq!(validate_claims(&claims(now, Duration::minutes(5)), now), Ok(()));
    }

    #[test]
    fn expired_and_future_tokens_fail() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(10), Duration::minutes(5));
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::Expired));

        let c = claims(now + Duration::minutes(1), Duration::minutes(5));
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::NotYetValid));

        let c = claims(now, Duration::zero());
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::InvalidTimeWindow));
    }

    #[test]
    fn claims_round_trip_the_user() {
        let now = Utc::now();
        let c = claims(now, Duration::minutes(5));
        let user = c.user();
        assert_eq!(JwtClaims::for_user(&user, c.issued_at, c.expires_at), c);
    }
}
