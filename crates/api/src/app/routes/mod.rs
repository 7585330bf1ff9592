use axum::Router;

pub mod auth;
pub mod loans;
pub mod system;

/// Router for all bearer-authenticated endpoints.
pub fn router() -> Router {
    Router::new().nest("/api/loans", loans::router())
}
