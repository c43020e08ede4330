//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API under `/api`, a health probe, and the
//! static page shell. Anything that is not an API route falls through to the
//! files in the configured site directory.

pub mod assistant;
pub mod bookings;
pub mod testimonials;

use std::path::Path;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::services::clinic::{self, ClinicProfile};
use crate::state::AppState;

/// JSON API routes, without the static fallback.
pub fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/clinic", get(clinic_profile))
        .route("/api/testimonials", get(testimonials::list))
        .route("/api/testimonials/window", get(testimonials::window))
        .route("/api/assistant/chat", post(assistant::chat))
        .route("/api/bookings", post(bookings::create))
        .layer(cors)
        .with_state(state)
}

/// Full application: API routes plus the page shell from `site_dir`.
pub fn app(state: AppState, site_dir: &Path) -> Router {
    let site = ServeDir::new(site_dir).append_index_html_on_directories(true);

    api_routes(state)
        .fallback_service(site)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /api/clinic`: phone, dial URI, locations and greeting.
async fn clinic_profile() -> Json<ClinicProfile> {
    Json(clinic::profile())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
