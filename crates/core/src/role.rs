use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Authorization level of an authenticated portal user.
///
/// Assigned by the authentication service at login and immutable for the
/// lifetime of the session. The set is closed: adding a role forces every
/// policy `match` to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staff,
    Admin,
    Superadmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Staff, Role::Admin, Role::Superadmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::Superadmin),
            other => Err(DomainError::unknown_variant("role", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Superadmin).unwrap(), "\"superadmin\"");
        let role: Role = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(role, Role::Staff);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(serde_json::from_str::<Role>("\"owner\"").is_err());
        assert!(matches!(
            "owner".parse::<Role>(),
            Err(DomainError::UnknownVariant { kind: "role", .. })
        ));
    }
}
