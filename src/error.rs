//! Error classification shared by services and HTTP handlers.
//!
//! Every service error implements [`ErrorCode`], giving it a stable `E_*`
//! code and a retryable flag. Handlers turn that into an [`ErrorBody`] so
//! clients can branch on the code without parsing messages.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON error payload returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl ErrorBody {
    pub fn from_error(err: &(impl ErrorCode + ?Sized)) -> Self {
        Self { code: err.error_code(), message: err.to_string(), retryable: err.retryable() }
    }

    /// Same code and flag, but with a message safe to show a visitor.
    pub fn with_public_message(err: &(impl ErrorCode + ?Sized), message: &str) -> Self {
        Self { code: err.error_code(), message: message.to_string(), retryable: err.retryable() }
    }
}

pub fn error_response(status: StatusCode, body: ErrorBody) -> Response {
    (status, Json(body)).into_response()
}
