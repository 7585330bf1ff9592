//! API-side authorization guard.
//!
//! Handlers call [`require`] before touching the loan store, so the backend
//! enforces the role policy even when a client skips its own checks.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use loanportal_auth::{Permission, explain_authorization};

use crate::context::PrincipalContext;

/// Check `required` for the request's principal; a denial becomes a 403.
pub fn require(principal: &PrincipalContext, required: &Permission) -> Result<(), Response> {
    let explanation = explain_authorization(principal.role(), required);
    if explanation.granted {
        return Ok(());
    }

    tracing::warn!(
        user_id = %principal.user_id(),
        role = %principal.role(),
        permission = %required,
        "request forbidden"
    );

    Err((
        StatusCode::FORBIDDEN,
        axum::Json(json!({
            "error": "forbidden",
            "message": explanation.reason,
            "explanation": explanation,
        })),
    )
        .into_response())
}
