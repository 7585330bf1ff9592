use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use loanportal_auth::ValidationErrors;

/// Uniform `{ error, message }` error body.
pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// 400 for a login body without both credentials.
pub fn missing_credentials() -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "validation_error",
        "Email and password are required",
    )
}

/// 500 with a generic message; the cause is only logged.
pub fn internal_error(cause: &dyn std::fmt::Display) -> axum::response::Response {
    tracing::error!(error = %cause, "request failed");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "Internal server error",
    )
}

/// 400 carrying every field error, keyed by field name.
pub fn validation_failed(invalid: &ValidationErrors) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": "validation_error",
            "message": invalid.to_string(),
            "fields": invalid,
        })),
    )
        .into_response()
}
