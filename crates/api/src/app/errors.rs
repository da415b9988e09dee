use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use careboard_core::DomainError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound { kind, .. } => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("{kind} not found"))
        }
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::Malformed(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "malformed_payload", msg)
        }
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

/// Generic failure body returned by the mutation endpoints.
pub fn mutation_failure(error: &'static str) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({
            "success": false,
            "error": error,
        })),
    )
        .into_response()
}
