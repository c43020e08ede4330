//! Booking modal form state.
//!
//! The modal is opened for a specific clinic location, collects the visitor's
//! details, and goes through one submit. A failed submit returns to editing
//! with a single error string and every entered value left in place, so the
//! visitor can simply press submit again.

#[cfg(test)]
#[path = "booking_test.rs"]
mod booking_test;

use serde::{Deserialize, Serialize};

/// The only error the form ever shows.
pub const BOOKING_ERROR_MESSAGE: &str = "Failed to submit booking. Please try again or call us directly.";

/// Raw form values as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFields {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// `YYYY-MM-DD` when given.
    #[serde(default)]
    pub preferred_date: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FullName,
    Phone,
    Email,
    PreferredDate,
    Notes,
}

impl BookingFields {
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::FullName => &mut self.full_name,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::PreferredDate => &mut self.preferred_date,
            Field::Notes => &mut self.notes,
        };
        *slot = value.into();
    }

    /// Required fields that are still blank.
    #[must_use]
    pub fn missing_required(&self) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.full_name.trim().is_empty() {
            missing.push(Field::FullName);
        }
        if self.phone.trim().is_empty() {
            missing.push(Field::Phone);
        }
        missing
    }
}

/// Body of a booking submission: the form plus the location it was opened for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSubmission {
    pub location: String,
    #[serde(flatten)]
    pub fields: BookingFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalStatus {
    Closed,
    Editing { error: Option<String> },
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone)]
pub struct BookingModal {
    location: String,
    fields: BookingFields,
    status: ModalStatus,
}

impl Default for BookingModal {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingModal {
    #[must_use]
    pub fn new() -> Self {
        Self { location: String::new(), fields: BookingFields::default(), status: ModalStatus::Closed }
    }

    /// Open for `location` with a blank form.
    pub fn open(&mut self, location: impl Into<String>) {
        self.location = location.into();
        self.fields = BookingFields::default();
        self.status = ModalStatus::Editing { error: None };
    }

    pub fn close(&mut self) {
        self.status = ModalStatus::Closed;
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn fields(&self) -> &BookingFields {
        &self.fields
    }

    #[must_use]
    pub fn status(&self) -> &ModalStatus {
        &self.status
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ModalStatus::Editing { error } => error.as_deref(),
            _ => None,
        }
    }

    /// Edits are accepted only while the form is editable.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if matches!(self.status, ModalStatus::Editing { .. }) {
            self.fields.set(field, value);
        }
    }

    /// Start a submit. Returns the payload to send, or `None` when the form is
    /// not editable or a required field is blank.
    pub fn begin_submit(&mut self) -> Option<BookingSubmission> {
        if !matches!(self.status, ModalStatus::Editing { .. }) || !self.fields.missing_required().is_empty() {
            return None;
        }
        self.status = ModalStatus::Submitting;
        Some(BookingSubmission { location: self.location.clone(), fields: self.fields.clone() })
    }

    /// Settle the in-flight submit.
    pub fn finish<E>(&mut self, result: Result<(), E>) {
        if self.status != ModalStatus::Submitting {
            return;
        }
        self.status = match result {
            Ok(()) => ModalStatus::Succeeded,
            Err(_) => ModalStatus::Editing { error: Some(BOOKING_ERROR_MESSAGE.to_string()) },
        };
    }
}
