//! The uniform failure envelope: `{"status": "fail"|"error", "message": …}`.
//!
//! Client mistakes (4xx) report `fail`, server-side trouble (5xx) reports
//! `error`, matching the global error-handling contract of the API.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use trailhead_core::DomainError;
use trailhead_store::StoreError;

pub fn json_fail(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    let kind = if status.is_server_error() { "error" } else { "fail" };
    (
        status,
        axum::Json(json!({
            "status": kind,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status = match &err {
        DomainError::Validation(_) | DomainError::InvalidId(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
    };
    json_fail(status, err.to_string())
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_fail(StatusCode::NOT_FOUND, "record not found"),
        StoreError::Internal(msg) => {
            tracing::error!("store failure: {msg}");
            json_fail(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}
