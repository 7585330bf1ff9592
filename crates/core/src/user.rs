use serde::{Deserialize, Serialize};

use crate::{Role, UserId};

/// Authenticated portal user, as returned by the authentication service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
}
