//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: collection wiring, auth configuration, stats aggregation
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and the uniform success envelope
//! - `errors.rs`: the uniform failure envelope
//! - `extract.rs`: body extraction that keeps the failure envelope

use std::sync::Arc;

use axum::{Extension, Router};

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

/// Runtime configuration read from the environment by `main.rs`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(config: AppConfig) -> Router {
    let services = Arc::new(services::AppServices::new(config));

    routes::router()
        .fallback(routes::system::not_found)
        .layer(Extension(services))
}
