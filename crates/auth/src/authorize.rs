use serde::Serialize;
use thiserror::Error;

use loanportal_core::Role;

use crate::Permission;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: role '{role}' lacks permission '{permission}'")]
    Forbidden { role: Role, permission: String },
}

static STAFF_PERMISSIONS: [Permission; 1] = [Permission::LOANS_READ];

static ADMIN_PERMISSIONS: [Permission; 2] = [Permission::LOANS_READ, Permission::LOANS_TOTAL_READ];

static SUPERADMIN_PERMISSIONS: [Permission; 3] = [
    Permission::LOANS_READ,
    Permission::LOANS_TOTAL_READ,
    Permission::LOANS_DELETE,
];

/// Role → permission policy.
///
/// The match is exhaustive on purpose: a new role does not compile until it
/// has been given an explicit grant set.
pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Staff => &STAFF_PERMISSIONS,
        Role::Admin => &ADMIN_PERMISSIONS,
        Role::Superadmin => &SUPERADMIN_PERMISSIONS,
    }
}

/// Authorize a role for a single permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(role: Role, required: &Permission) -> Result<(), AuthzError> {
    if permissions_for(role).contains(required) {
        Ok(())
    } else {
        tracing::debug!(%role, permission = %required, "authorization denied");
        Err(AuthzError::Forbidden {
            role,
            permission: required.as_str().to_string(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
///
/// Attached to audit logs and to 403 bodies so a denied caller can see what
/// their role actually grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationExplanation {
    /// The permission that was being checked.
    pub required_permission: String,

    /// Whether the authorization was granted.
    pub granted: bool,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// Role of the principal being checked.
    pub role: Role,

    /// Everything the role grants, sorted.
    pub effective_permissions: Vec<String>,
}

/// Explain why an authorization decision was made (or would be made).
pub fn explain_authorization(role: Role, required: &Permission) -> AuthorizationExplanation {
    let mut effective_permissions: Vec<String> = permissions_for(role)
        .iter()
        .map(|p| p.as_str().to_string())
        .collect();
    effective_permissions.sort();

    let granted = authorize(role, required).is_ok();
    let reason = if granted {
        format!("role '{role}' grants '{required}'")
    } else {
        format!("role '{role}' does not grant '{required}'")
    };

    AuthorizationExplanation {
        required_permission: required.as_str().to_string(),
        granted,
        reason,
        role,
        effective_permissions,
    }
}
