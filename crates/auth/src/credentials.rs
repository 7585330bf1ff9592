//! Login form validation and the login wire contract.
//!
//! Validation here runs before any request is built: a form that fails it
//! never reaches the network.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use loanportal_core::User;

/// Minimum password length accepted by the login form.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum password length for a new account.
pub const MIN_SIGNUP_PASSWORD_LEN: usize = 8;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Per-field validation failures, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, (field, msg)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        errors.add("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.add("email", "Please enter a valid email address");
    }
}

fn check_password(errors: &mut ValidationErrors, password: &str, min_len: usize) {
    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if password.chars().count() < min_len {
        errors.add(
            "password",
            format!("Password must be at least {min_len} characters"),
        );
    }
}

/// Credentials as typed into the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember_me: false,
        }
    }

    pub fn remember_me(mut self, remember_me: bool) -> Self {
        self.remember_me = remember_me;
        self
    }

    /// Check every field and report all failures at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password, MIN_PASSWORD_LEN);

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            remember_me: self.remember_me,
        }
    }
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: User,
    pub token: String,
}

/// Registration form. Submitting it does not sign the user in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_to_terms: bool,
}

impl SignupForm {
    /// Check every field and report all failures at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.first_name.trim().is_empty() {
            errors.add("firstName", "First name is required");
        }
        if self.last_name.trim().is_empty() {
            errors.add("lastName", "Last name is required");
        }
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password, MIN_SIGNUP_PASSWORD_LEN);

        if self.confirm_password.is_empty() {
            errors.add("confirmPassword", "Please confirm your password");
        } else if self.password != self.confirm_password {
            errors.add("confirmPassword", "Passwords do not match");
        }

        if !self.agree_to_terms {
            errors.add("agreeToTerms", "You must agree to the terms and conditions");
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Display name for the new account.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    pub fn to_request(&self) -> SignupRequest {
        SignupRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
            agree_to_terms: self.agree_to_terms,
        }
    }
}

/// Body of `POST /api/auth/signup`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_to_terms: bool,
}

impl From<SignupRequest> for SignupForm {
    fn from(req: SignupRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            agree_to_terms: req.agree_to_terms,
        }
    }
}

/// Successful signup response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}
