//! Client-side error taxonomy.

use thiserror::Error;

use loanportal_auth::ValidationErrors;

use crate::session::SessionError;

/// Every failure the client can surface to a user.
///
/// None of these is fatal: each is recovered from by retrying the action that
/// triggered it (after editing the form, for `Validation`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortalError {
    /// Form input rejected locally; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Missing, invalid or expired credentials (HTTP 401).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The role does not allow the action (checked locally, or HTTP 403).
    #[error("not authorized: {0}")]
    Authorization(String),

    /// Transport failure or timeout.
    #[error("network error: {0}")]
    Network(String),

    /// The local session could not be written or removed.
    #[error("session storage failed: {0}")]
    Session(String),

    /// Any other non-success status, or a body that could not be decoded.
    #[error("server error: {message}")]
    Server { status: Option<u16>, message: String },
}

impl PortalError {
    pub fn server(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Whether simply repeating the request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PortalError::Network(_) | PortalError::Server { .. })
    }
}

impl From<SessionError> for PortalError {
    fn from(value: SessionError) -> Self {
        Self::Session(value.to_string())
    }
}

impl From<ValidationErrors> for PortalError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            PortalError::server(
                value.status().map(|s| s.as_u16()),
                format!("malformed response body: {value}"),
            )
        } else {
            PortalError::Network(value.to_string())
        }
    }
}
