use loanportal_auth::JwtClaims;
use loanportal_core::{Role, UserId};

/// Principal context for a request (authenticated identity + role).
///
/// Derived from the bearer token only; immutable for the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    user_id: UserId,
    email: String,
    role: Role,
}

impl PrincipalContext {
    pub fn new(user_id: UserId, email: String, role: Role) -> Self {
        Self {
            user_id,
            email,
            role,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl From<&JwtClaims> for PrincipalContext {
    fn from(claims: &JwtClaims) -> Self {
        Self::new(claims.sub.clone(), claims.email.clone(), claims.role)
    }
}
