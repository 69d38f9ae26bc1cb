use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_core::DomainError;
use stockroom_store::StoreError;

/// Map a store failure to a consistent JSON error response.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(e),
        StoreError::Constraint(v) => {
            json_error(StatusCode::CONFLICT, "constraint_violation", v.to_string())
        }
        StoreError::Database(e) => {
            // Unrecoverable here; log and fail the request.
            tracing::error!("store failure: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "internal error",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match &err {
        DomainError::Validation(_) | DomainError::InsufficientStock { .. } => {
            let fields = err.field_errors().unwrap_or_default();
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                axum::Json(json!({
                    "error": "validation_error",
                    "message": err.to_string(),
                    "fields": fields,
                })),
            )
                .into_response()
        }
        DomainError::InvalidId(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", msg.clone())
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}

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
