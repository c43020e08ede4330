//! Booking submissions.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Serialize;
use uuid::Uuid;
use widgets::booking::{BOOKING_ERROR_MESSAGE, BookingSubmission};

use crate::error::{ErrorBody, error_response};
use crate::services::booking::{self, BookingError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedBooking {
    pub id: Uuid,
}

/// `POST /api/bookings`: validate and record one appointment request.
pub async fn create(
    State(state): State<AppState>,
    Json(submission): Json<BookingSubmission>,
) -> Result<(StatusCode, Json<CreatedBooking>), Response> {
    let id = booking::submit(state.bookings.as_ref(), submission)
        .await
        .map_err(|e| booking_error_response(&e))?;
    Ok((StatusCode::CREATED, Json(CreatedBooking { id })))
}

pub(crate) fn booking_error_status(err: &BookingError) -> StatusCode {
    match err {
        BookingError::MissingField(_) | BookingError::TooLong { .. } | BookingError::InvalidDate(_) => {
            StatusCode::BAD_REQUEST
        }
        BookingError::WriteFailed(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Store failures carry only the fixed visitor-facing message.
fn booking_error_response(err: &BookingError) -> Response {
    let body = match err {
        BookingError::WriteFailed(_) => ErrorBody::with_public_message(err, BOOKING_ERROR_MESSAGE),
        _ => ErrorBody::from_error(err),
    };
    error_response(booking_error_status(err), body)
}
