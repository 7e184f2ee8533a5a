use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::Utc;
use serde_json::Value;

use trailhead_core::TourId;
use trailhead_domain::{NewTour, Tour, UpdateTour};
use trailhead_query::{QueryFeatures, RawQueryParams};
use trailhead_store::Collection;

use crate::app::extract::Json;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/top-5-cheap", get(top_five_cheap))
        .route("/stats", get(stats))
        .route("/", get(list_tours).post(create_tour))
        .route("/:id", get(get_tour).patch(update_tour).delete(delete_tour))
}

pub async fn list_tours(
    _user: CurrentUser,
    Extension(services): Extension<Arc<AppServices>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    run_list(&services, RawQueryParams::from_pairs(pairs))
}

/// Alias route: presets the reserved keys for "best five cheap tours" and
/// delegates to the generic list pipeline.
pub async fn top_five_cheap(
    Extension(services): Extension<Arc<AppServices>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> axum::response::Response {
    let mut params = RawQueryParams::from_pairs(pairs);
    params.set("limit", "5");
    params.set("sort", "-ratingsAverage,price");
    params.set("fields", "name,price,ratingsAverage,summary,difficulty");
    run_list(&services, params)
}

fn run_list(services: &AppServices, params: RawQueryParams) -> axum::response::Response {
    let options = QueryFeatures::new(params)
        .filter()
        .sort()
        .limit_fields()
        .paginate()
        .build();

    match services.tours.find(&options) {
        Ok(docs) => dto::success_list("tours", docs),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_tour(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewTour>,
) -> axum::response::Response {
    let tour = match Tour::create(TourId::new(), body, Utc::now()) {
        Ok(t) => t,
        Err(e) => return errors::domain_error_to_response(e),
    };

    // Check-and-insert under one lock; a separate uniqueness probe would
    // race with a concurrent create of the same name.
    match services
        .tours
        .insert_unique(*tour.id.as_uuid(), tour.clone(), &|t| t.name == tour.name)
    {
        Ok(true) => {}
        Ok(false) => {
            return errors::json_fail(StatusCode::CONFLICT, "A tour with that name already exists")
        }
        Err(e) => return errors::store_error_to_response(e),
    }

    tracing::info!(tour = %tour.id, "tour created");
    dto::success(StatusCode::CREATED, "tour", to_json(&tour))
}

pub async fn get_tour(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TourId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.tours.get(*id.as_uuid()) {
        Ok(Some(tour)) => dto::success(StatusCode::OK, "tour", to_json(&tour)),
        Ok(None) => errors::json_fail(StatusCode::NOT_FOUND, "No tour found with that ID"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_tour(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTour>,
) -> axum::response::Response {
    let id: TourId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let mut tour = match services.tours.get(*id.as_uuid()) {
        Ok(Some(t)) => t,
        Ok(None) => return errors::json_fail(StatusCode::NOT_FOUND, "No tour found with that ID"),
        Err(e) => return errors::store_error_to_response(e),
    };

    let name_before = tour.name.clone();
    if let Err(e) = tour.apply_update(body) {
        return errors::domain_error_to_response(e);
    }

    if tour.name != name_before {
        match services.tour_name_taken(&tour.name, Some(id)) {
            Ok(true) => {
                return errors::json_fail(
                    StatusCode::CONFLICT,
                    "A tour with that name already exists",
                )
            }
            Ok(false) => {}
            Err(e) => return errors::store_error_to_response(e),
        }
    }

    match services.tours.replace(*id.as_uuid(), tour.clone()) {
        Ok(()) => dto::success(StatusCode::OK, "tour", to_json(&tour)),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_tour(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TourId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.tours.delete(*id.as_uuid()) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => errors::json_fail(StatusCode::NOT_FOUND, "No tour found with that ID"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn stats(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.tour_stats() {
        Ok(stats) => dto::success(
            StatusCode::OK,
            "stats",
            serde_json::to_value(stats).unwrap_or(Value::Null),
        ),
        Err(e) => errors::store_error_to_response(e),
    }
}

fn to_json(tour: &Tour) -> Value {
    serde_json::to_value(tour).unwrap_or(Value::Null)
}
