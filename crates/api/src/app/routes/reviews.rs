use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    routing::get,
    Router,
};
use chrono::Utc;
use serde_json::Value;

use trailhead_auth::Role;
use trailhead_core::ReviewId;
use trailhead_domain::{NewReview, Review};
use trailhead_query::{QueryFeatures, RawQueryParams};
use trailhead_store::Collection;

use crate::app::extract::Json;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz::restrict_to;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new().route("/", get(list_reviews).post(create_review))
}

pub async fn list_reviews(
    Extension(services): Extension<Arc<AppServices>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    let options = QueryFeatures::new(RawQueryParams::from_pairs(pairs))
        .filter()
        .sort()
        .limit_fields()
        .paginate()
        .build();

    match services.reviews.find(&options) {
        Ok(docs) => dto::success_list("reviews", docs),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Reviews are authored by regular users only; the author comes from the
/// token, never the body.
pub async fn create_review(
    user: CurrentUser,
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewReview>,
) -> axum::response::Response {
    if let Err(resp) = restrict_to(&user, &[Role::User]) {
        return resp;
    }

    let review = match Review::create(ReviewId::new(), body, user.id(), Utc::now()) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.tours.get(*review.tour.as_uuid()) {
        Ok(Some(_)) => {}
        Ok(None) => return errors::json_fail(StatusCode::NOT_FOUND, "No tour found with that ID"),
        Err(e) => return errors::store_error_to_response(e),
    }

    if let Err(e) = services.reviews.insert(*review.id.as_uuid(), review.clone()) {
        return errors::store_error_to_response(e);
    }

    tracing::info!(review = %review.id, tour = %review.tour, "review created");
    dto::success(
        StatusCode::CREATED,
        "review",
        serde_json::to_value(&review).unwrap_or(Value::Null),
    )
}
