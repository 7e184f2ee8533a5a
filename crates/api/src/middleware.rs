use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::Response,
};

use trailhead_auth::{verify_token, AuthError};
use trailhead_store::Collection;

use crate::app::errors::json_fail;
use crate::app::services::AppServices;
use crate::context::CurrentUser;

/// `protect` as an extractor: routes that take [`CurrentUser`] require a
/// valid bearer token belonging to a still-existing user. Everything else
/// stays public, matching the per-route protection of the routing table.
#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let services = parts
            .extensions
            .get::<Arc<AppServices>>()
            .cloned()
            .ok_or_else(|| {
                json_fail(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "application services not wired",
                )
            })?;

        let token = extract_bearer(&parts.headers).ok_or_else(|| {
            json_fail(
                StatusCode::UNAUTHORIZED,
                "You are not logged in. Please log in to get access.",
            )
        })?;

        let claims = verify_token(token, services.jwt_secret()).map_err(|e| {
            tracing::debug!("token rejected: {e}");
            let message = match e {
                AuthError::Expired => "Your token has expired. Please log in again.",
                _ => "Invalid token. Please log in again.",
            };
            json_fail(StatusCode::UNAUTHORIZED, message)
        })?;

        let user = services
            .users
            .get(*claims.sub.as_uuid())
            .map_err(crate::app::errors::store_error_to_response)?
            .ok_or_else(|| {
                json_fail(
                    StatusCode::UNAUTHORIZED,
                    "The user belonging to this token no longer exists.",
                )
            })?;

        Ok(CurrentUser { user })
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
