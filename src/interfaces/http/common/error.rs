//! DomainError → HTTP response mapping

use axum::http::StatusCode;
use axum::Json;
use tracing::{error, warn};

use super::ApiResponse;
use crate::domain::DomainError;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub fn domain_error_response(e: DomainError) -> ApiError {
    match e {
        DomainError::Validation(violations) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::validation(
                violations.iter().map(ToString::to_string).collect(),
            )),
        ),
        e @ DomainError::NotFound { .. } => {
            (StatusCode::NOT_FOUND, Json(ApiResponse::error(e.to_string())))
        }
        e @ DomainError::DuplicateKey(_) => {
            warn!(error = %e, "Rejected duplicate identity");
            (StatusCode::CONFLICT, Json(ApiResponse::error(e.to_string())))
        }
        e @ DomainError::Unexpected(_) => {
            error!(error = %e, "Request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        }
    }
}
