//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: in-memory user directory, loan store, token issuer
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use chrono::Utc;

use loanportal_auth::{Hs256JwtValidator, JwtValidator};

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router over freshly seeded services (used by `main.rs`).
pub fn build_app(config: ApiConfig) -> Router {
    let services = Arc::new(services::AppServices::seeded(&config, Utc::now().date_naive()));
    let jwt = Arc::new(Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
    build_router(services, jwt)
}

/// Build the router over explicit services and token validator.
pub fn build_router(services: Arc<services::AppServices>, jwt: Arc<dyn JwtValidator>) -> Router {
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require a valid bearer token.
    let protected = routes::router().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/signup", post(routes::auth::signup))
        .merge(protected)
        .layer(Extension(services))
}
