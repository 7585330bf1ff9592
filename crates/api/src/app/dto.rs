use serde::{Deserialize, Serialize};

use loanportal_core::{Loan, LoanId};

// -------------------------
// Request DTOs
// -------------------------

/// Login body as sent by the portal. Fields are optional so a missing one is
/// a 400 rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub remember_me: bool,
}

impl LoginBody {
    /// Trimmed email and raw password, if both are present and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let email = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoansResponse {
    pub loans: Vec<Loan>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: LoanId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_body_requires_both_fields() {
        let body: LoginBody =
            serde_json::from_str(r#"{"email":" ana@example.com ","password":"secret1"}"#).unwrap();
        assert_eq!(body.credentials(), Some(("ana@example.com", "secret1")));
        assert!(!body.remember_me);

        let body: LoginBody = serde_json::from_str(r#"{"email":"ana@example.com"}"#).unwrap();
        assert_eq!(body.credentials(), None);

        let body: LoginBody =
            serde_json::from_str(r#"{"email":"  ","password":"x","rememberMe":true}"#).unwrap();
        assert_eq!(body.credentials(), None);
        assert!(body.remember_me);
    }
}
