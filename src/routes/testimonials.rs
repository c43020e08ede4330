//! Testimonial list and rotation windows.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use widgets::carousel::DEFAULT_ITEMS_TO_SHOW;

use crate::error::{ErrorBody, error_response};
use crate::services::testimonials::{self, TestimonialRecord};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    #[serde(default)]
    pub position: usize,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct WindowResponse {
    /// Position after wrapping modulo the list length.
    pub position: usize,
    pub total: usize,
    pub items: Vec<TestimonialRecord>,
}

/// `GET /api/testimonials`: the full list in display order.
pub async fn list(State(state): State<AppState>) -> Json<Vec<TestimonialRecord>> {
    Json(state.testimonials.to_vec())
}

/// `GET /api/testimonials/window?position=&count=`: the records a carousel
/// at `position` shows. `count` defaults to three and is clamped to the list.
pub async fn window(
    State(state): State<AppState>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<WindowResponse>, Response> {
    let total = state.testimonials.len();
    let count = query.count.unwrap_or(DEFAULT_ITEMS_TO_SHOW);
    let items = testimonials::window(&state.testimonials, query.position, count)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, ErrorBody::from_error(&e)))?;

    Ok(Json(WindowResponse {
        position: query.position.checked_rem(total).unwrap_or(0),
        total,
        items: items.into_iter().cloned().collect(),
    }))
}
