use axum::{routing::get, Router};

pub mod reviews;
pub mod system;
pub mod tours;
pub mod users;

/// Full routing table; resources are mounted under `/api/v1`.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/api/v1/tours", tours::router())
        .nest("/api/v1/users", users::router())
        .nest("/api/v1/reviews", reviews::router())
}
