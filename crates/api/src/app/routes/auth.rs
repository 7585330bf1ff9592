use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use loanportal_auth::{JwtClaims, LoginResponse, SignupForm, SignupRequest, SignupResponse};

use crate::app::{
    dto, errors,
    services::{AppServices, RegisterError},
};

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginBody>, JsonRejection>,
) -> axum::response::Response {
    let Ok(Json(body)) = body else {
        return errors::missing_credentials();
    };
    let Some((email, password)) = body.credentials() else {
        return errors::missing_credentials();
    };

    let Some(user) = services.users.verify(email, password) else {
        tracing::info!(email, "login rejected");
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "Invalid email or password",
        );
    };

    let issued_at = Utc::now();
    let claims = JwtClaims::for_user(&user, issued_at, issued_at + services.ttl(body.remember_me));
    let token = match services.issuer.issue(&claims) {
        Ok(t) => t,
        Err(e) => return errors::internal_error(&e),
    };

    tracing::info!(user_id = %user.id, role = %user.role, remember_me = body.remember_me, "login succeeded");

    (
        StatusCode::OK,
        Json(LoginResponse {
            message: Some("Login successful".to_string()),
            user,
            token,
        }),
    )
        .into_response()
}

/// Register a staff account. Does not issue a token.
pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> axum::response::Response {
    let form = match body {
        Ok(Json(req)) => SignupForm::from(req),
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text());
        }
    };
    if let Err(invalid) = form.validate() {
        return errors::validation_failed(&invalid);
    }

    match services
        .users
        .register(form.full_name(), form.email.trim(), &form.password)
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "account registered");
            (
                StatusCode::CREATED,
                Json(SignupResponse {
                    message: Some("Signup successful".to_string()),
                    user: Some(user),
                }),
            )
                .into_response()
        }
        Err(RegisterError::EmailTaken) => errors::json_error(
            StatusCode::CONFLICT,
            "email_taken",
            "An account with this email already exists",
        ),
    }
}
