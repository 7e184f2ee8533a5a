use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::Value;

use trailhead_auth::Role;
use trailhead_core::UserId;
use trailhead_domain::{NewUser, User};
use trailhead_query::{QueryFeatures, RawQueryParams};
use trailhead_store::Collection;

use crate::app::dto::{self, LoginRequest};
use crate::app::extract::Json;
use crate::app::services::AppServices;
use crate::app::errors;
use crate::authz::restrict_to;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/", get(list_users))
        .route("/:id", get(get_user))
}

pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewUser>,
) -> axum::response::Response {
    let (name, email, photo, password) = match body.validate() {
        Ok(parts) => parts,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let hash = match services.hasher().hash(&password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!(error = %e, "password hashing failed");
            return errors::json_fail(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
        }
    };

    let user = User::new(UserId::new(), name, email, photo, hash, Role::User, Utc::now());
    // Check-and-insert under one lock so two racing signups with the same
    // email cannot both pass a separate uniqueness probe.
    match services
        .users
        .insert_unique(*user.id.as_uuid(), user.clone(), &|u| u.email == user.email)
    {
        Ok(true) => {}
        Ok(false) => {
            return errors::json_fail(StatusCode::CONFLICT, "Email address already in use")
        }
        Err(e) => return errors::store_error_to_response(e),
    }

    let token = match services.sign_token_for(&user) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "token signing failed");
            return errors::json_fail(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
        }
    };

    tracing::info!(user = %user.id, "user signed up");
    dto::success_with_token(StatusCode::CREATED, token, Some(("user", to_json(&user))))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginRequest>,
) -> axum::response::Response {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return errors::json_fail(StatusCode::BAD_REQUEST, "Please provide email and password");
    };

    let user = match services.find_user_by_email(email.trim().to_lowercase().as_str()) {
        Ok(Some(u)) => u,
        Ok(None) => {
            return errors::json_fail(StatusCode::UNAUTHORIZED, "Incorrect email or password")
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    match services.hasher().verify(&password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return errors::json_fail(StatusCode::UNAUTHORIZED, "Incorrect email or password")
        }
        Err(e) => {
            tracing::error!(error = %e, "password verification failed");
            return errors::json_fail(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
        }
    }

    let token = match services.sign_token_for(&user) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "token signing failed");
            return errors::json_fail(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
        }
    };

    dto::success_with_token(StatusCode::OK, token, None)
}

pub async fn list_users(
    user: CurrentUser,
    Extension(services): Extension<Arc<AppServices>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    if let Err(resp) = restrict_to(&user, &[Role::Admin]) {
        return resp;
    }

    let options = QueryFeatures::new(RawQueryParams::from_pairs(pairs))
        .filter()
        .sort()
        .limit_fields()
        .paginate()
        .build();

    match services.users.find(&options) {
        Ok(docs) => dto::success_list("users", docs),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_user(
    user: CurrentUser,
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = restrict_to(&user, &[Role::Admin]) {
        return resp;
    }

    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.users.get(*id.as_uuid()) {
        Ok(Some(found)) => dto::success(StatusCode::OK, "user", to_json(&found)),
        Ok(None) => errors::json_fail(StatusCode::NOT_FOUND, "No user found with that ID"),
        Err(e) => errors::store_error_to_response(e),
    }
}

fn to_json(user: &User) -> Value {
    serde_json::to_value(user).unwrap_or(Value::Null)
}
