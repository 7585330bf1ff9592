use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. "loans.read"). The loan
/// portal's own permissions are exposed as associated constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    /// List loan records.
    pub const LOANS_READ: Permission = Permission(Cow::Borrowed("loans.read"));

    /// See the `totalLoan` field of a loan record.
    pub const LOANS_TOTAL_READ: Permission = Permission(Cow::Borrowed("loans.total.read"));

    /// Delete loan records.
    pub const LOANS_DELETE: Permission = Permission(Cow::Borrowed("loans.delete"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
