//! Booking service: validate a submission and write one appointment row.
//!
//! DESIGN
//! ======
//! A submission becomes a [`BookingRequest`] only after validation, and the
//! request is written exactly once through a [`BookingStore`]. Rows are never
//! read back. Two stores exist: the hosted table behind a PostgREST endpoint
//! (the default) and a direct Postgres pool. Store failures all collapse to
//! [`BookingError::WriteFailed`]; the visitor sees one fixed message.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use time::Date;
use time::macros::format_description;
use tracing::{info, warn};
use uuid::Uuid;
use widgets::booking::BookingSubmission;

use crate::error::ErrorCode;

const REST_TIMEOUT_SECS: u64 = 15;
const MAX_FIELD_CHARS: usize = 500;
const MAX_NOTES_CHARS: usize = 4_000;

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("field {field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("preferred_date must be YYYY-MM-DD, got {0:?}")]
    InvalidDate(String),
    #[error("booking write failed: {0}")]
    WriteFailed(String),
}

impl ErrorCode for BookingError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "E_MISSING_FIELD",
            Self::TooLong { .. } => "E_FIELD_TOO_LONG",
            Self::InvalidDate(_) => "E_INVALID_DATE",
            Self::WriteFailed(_) => "E_BOOKING_WRITE_FAILED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::WriteFailed(_))
    }
}

// =============================================================================
// BOOKING REQUEST
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
}

impl BookingStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
        }
    }
}

/// One appointment row as written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRequest {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    /// Validated `YYYY-MM-DD`.
    pub preferred_date: Option<String>,
    pub location: String,
    pub notes: Option<String>,
    pub status: BookingStatus,
}

impl BookingRequest {
    /// Validate a submission and assign it an id.
    ///
    /// Values are trimmed; blank optional values become `None`.
    ///
    /// # Errors
    ///
    /// Returns an error when `full_name`, `phone` or `location` is blank, a
    /// value is too long, or `preferred_date` is not a calendar date.
    pub fn from_submission(submission: BookingSubmission) -> Result<Self, BookingError> {
        let BookingSubmission { location, fields } = submission;

        let full_name = required("full_name", &fields.full_name)?;
        let phone = required("phone", &fields.phone)?;
        let location = required("location", &location)?;
        let email = optional("email", &fields.email, MAX_FIELD_CHARS)?;
        let notes = optional("notes", &fields.notes, MAX_NOTES_CHARS)?;
        let preferred_date = optional("preferred_date", &fields.preferred_date, MAX_FIELD_CHARS)?
            .map(|raw| parse_date(&raw).map(|_| raw))
            .transpose()?;

        Ok(Self {
            id: Uuid::new_v4(),
            full_name,
            phone,
            email,
            preferred_date,
            location,
            notes,
            status: BookingStatus::Pending,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, BookingError> {
    optional(field, value, MAX_FIELD_CHARS)?.ok_or(BookingError::MissingField(field))
}

fn optional(field: &'static str, value: &str, max: usize) -> Result<Option<String>, BookingError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.chars().count() > max {
        return Err(BookingError::TooLong { field, max });
    }
    Ok(Some(value.to_string()))
}

fn parse_date(raw: &str) -> Result<Date, BookingError> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|_| BookingError::InvalidDate(raw.to_string()))
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Destination for booking rows. Enables mocking in tests.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Write one row.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::WriteFailed`] for any failure to persist.
    async fn insert(&self, booking: &BookingRequest) -> Result<(), BookingError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Validate `submission` and write it through `store`.
///
/// # Errors
///
/// Returns a validation error before touching the store, or the store's
/// [`BookingError::WriteFailed`].
pub async fn submit(store: &dyn BookingStore, submission: BookingSubmission) -> Result<Uuid, BookingError> {
    let booking = BookingRequest::from_submission(submission)?;
    match store.insert(&booking).await {
        Ok(()) => {
            info!(id = %booking.id, location = %booking.location, backend = store.backend(), "booking: recorded");
            Ok(booking.id)
        }
        Err(e) => {
            warn!(id = %booking.id, backend = store.backend(), error = %e, "booking: write failed");
            Err(e)
        }
    }
}

// =============================================================================
// REST STORE
// =============================================================================

/// Hosted `appointments` table behind a PostgREST endpoint.
pub struct RestBookingStore {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl RestBookingStore {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, BookingError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REST_TIMEOUT_SECS))
            .build()
            .map_err(|e| BookingError::WriteFailed(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: format!("{}/rest/v1/appointments", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl BookingStore for RestBookingStore {
    async fn insert(&self, booking: &BookingRequest) -> Result<(), BookingError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&[booking])
            .send()
            .await
            .map_err(|e| BookingError::WriteFailed(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(BookingError::WriteFailed(format!("status {}: {}", status.as_u16(), body.trim())))
    }

    fn backend(&self) -> &'static str {
        "rest"
    }
}

// =============================================================================
// POSTGRES STORE
// =============================================================================

/// Direct insert into the `appointments` table.
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn insert(&self, booking: &BookingRequest) -> Result<(), BookingError> {
        sqlx::query(
            "INSERT INTO appointments (id, full_name, phone, email, preferred_date, location, notes, status) \
             VALUES ($1, $2, $3, $4, $5::date, $6, $7, $8)",
        )
        .bind(booking.id)
        .bind(&booking.full_name)
        .bind(&booking.phone)
        .bind(&booking.email)
        .bind(&booking.preferred_date)
        .bind(&booking.location)
        .bind(&booking.notes)
        .bind(booking.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| BookingError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
#[path = "booking_test.rs"]
mod tests;
