use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use chrono::Utc;

use loanportal_auth::Permission;
use loanportal_core::LoanId;

use crate::app::{dto, errors, services::AppServices};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_loans))
        .route("/expired", get(list_expired))
        .route("/:id/get", get(list_user_loans))
        .route("/:id/delete", delete(delete_loan))
}

pub async fn list_loans(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, &Permission::LOANS_READ) {
        return resp;
    }
    Json(dto::LoansResponse {
        loans: services.loans.all(),
    })
    .into_response()
}

/// Loans owned by the user with the given email (the path segment).
pub async fn list_user_loans(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(email): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, &Permission::LOANS_READ) {
        return resp;
    }
    Json(dto::LoansResponse {
        loans: services.loans.by_user(&email),
    })
    .into_response()
}

pub async fn list_expired(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, &Permission::LOANS_READ) {
        return resp;
    }
    Json(dto::LoansResponse {
        loans: services.loans.expired(Utc::now().date_naive()),
    })
    .into_response()
}

pub async fn delete_loan(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = crate::authz::require(&principal, &Permission::LOANS_DELETE) {
        return resp;
    }

    let id: LoanId = match id.parse() {
        Ok(id) => id,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string());
        }
    };

    match services.loans.delete(&id) {
        Some(_) => {
            tracing::info!(loan_id = %id, user_id = %principal.user_id(), "loan deleted");
            (
                StatusCode::OK,
                Json(dto::DeleteResponse {
                    message: "Loan deleted successfully".to_string(),
                    id,
                }),
            )
                .into_response()
        }
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "Loan not found"),
    }
}
