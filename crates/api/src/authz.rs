use axum::{http::StatusCode, response::Response};

use trailhead_auth::Role;

use crate::app::errors::json_fail;
use crate::context::CurrentUser;

/// Role gate checked after authentication, at the top of a handler.
pub fn restrict_to(user: &CurrentUser, allowed: &[Role]) -> Result<(), Response> {
    if user.role().is_any_of(allowed) {
        Ok(())
    } else {
        Err(json_fail(
            StatusCode::FORBIDDEN,
            "You do not have permission to perform this action",
        ))
    }
}
