pub mod companies;
pub mod location_types;
pub mod locations;

use axum::routing::{delete, get};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Companies
        .route("/api/v1/companies", get(companies::list).post(companies::create))
        .route("/api/v1/companies/{id}", get(companies::get))
        // Location types
        .route(
            "/api/v1/location-types",
            get(location_types::list).post(location_types::create),
        )
        // Locations
        .route(
            "/api/v1/companies/{id}/locations",
            get(locations::list_by_company).post(locations::create),
        )
        .route(
            "/api/v1/locations/{id}",
            get(locations::get)
                .patch(locations::update)
                .delete(locations::delete),
        )
        .route("/api/v1/locations/{id}/purge", delete(locations::purge))
        .route("/api/v1/locations/{id}/audit", get(locations::audit_log))
}
