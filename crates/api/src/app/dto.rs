//! Request DTOs and the uniform success envelope.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::{json, Value};

/// Login body; fields optional so a missing credential maps to the API's own
/// 400 message rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `{"status": "success", "data": {<key>: <value>}}`
pub fn success(status: StatusCode, key: &str, value: Value) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "status": "success",
            "data": { key: value },
        })),
    )
        .into_response()
}

/// List envelope with the `results` count:
/// `{"status": "success", "results": n, "data": {<key>: […]}}`
pub fn success_list(key: &str, items: Vec<Value>) -> axum::response::Response {
    (
        StatusCode::OK,
        axum::Json(json!({
            "status": "success",
            "results": items.len(),
            "data": { key: items },
        })),
    )
        .into_response()
}

/// Signup/login envelope carrying the issued token.
pub fn success_with_token(
    status: StatusCode,
    token: String,
    data: Option<(&str, Value)>,
) -> axum::response::Response {
    let mut body = json!({
        "status": "success",
        "token": token,
    });
    if let Some((key, value)) = data {
        body["data"] = json!({ key: value });
    }
    (status, axum::Json(body)).into_response()
}
