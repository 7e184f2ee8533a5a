use axum::http::{StatusCode, Uri};

use crate::app::errors::json_fail;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Unhandled-route handler; keeps the uniform failure envelope even for
/// paths outside the routing table.
pub async fn not_found(uri: Uri) -> axum::response::Response {
    tracing::info!("unhandled route: {uri}");
    json_fail(
        StatusCode::NOT_FOUND,
        format!("Can't find {} on this server", uri.path()),
    )
}
