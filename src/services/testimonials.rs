//! Testimonials: the static review list and its rotation windows.
//!
//! The list ships inside the binary and is validated once at startup. Window
//! queries reuse [`widgets::carousel::Carousel`], so the server and any
//! client agree on which reviews a position shows.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use widgets::carousel::{Carousel, CarouselError};

use crate::error::ErrorCode;

const EMBEDDED: &str = include_str!("../../data/testimonials.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonialRecord {
    pub id: u32,
    pub author: String,
    pub role: String,
    /// 1 to 5.
    pub rating: u8,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestimonialError {
    #[error("testimonial data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("testimonial {id} has rating {rating}, expected 1..=5")]
    RatingOutOfRange { id: u32, rating: u8 },
    #[error("duplicate testimonial id {0}")]
    DuplicateId(u32),
    #[error(transparent)]
    Window(#[from] CarouselError),
}

impl ErrorCode for TestimonialError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_TESTIMONIAL_PARSE",
            Self::RatingOutOfRange { .. } => "E_TESTIMONIAL_RATING",
            Self::DuplicateId(_) => "E_TESTIMONIAL_DUPLICATE",
            Self::Window(_) => "E_TESTIMONIAL_WINDOW",
        }
    }
}

/// Load the list compiled into the binary.
///
/// # Errors
///
/// Returns an error if the embedded document is malformed.
pub fn load() -> Result<Vec<TestimonialRecord>, TestimonialError> {
    parse(EMBEDDED)
}

/// Parse and validate a testimonial document.
///
/// # Errors
///
/// Returns an error for invalid JSON, a rating outside 1..=5, or a repeated id.
pub fn parse(json: &str) -> Result<Vec<TestimonialRecord>, TestimonialError> {
    let records: Vec<TestimonialRecord> = serde_json::from_str(json)?;
    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !(1..=5).contains(&record.rating) {
            return Err(TestimonialError::RatingOutOfRange { id: record.id, rating: record.rating });
        }
        if !seen.insert(record.id) {
            return Err(TestimonialError::DuplicateId(record.id));
        }
    }
    Ok(records)
}

/// Records visible at `position` when `count` are shown at once.
///
/// `position` wraps modulo the list length, like the carousel's own
/// navigation. An empty list yields an empty window.
///
/// # Errors
///
/// Returns an error only if the carousel rejects the window parameters.
pub fn window(
    records: &[TestimonialRecord],
    position: usize,
    count: usize,
) -> Result<Vec<&TestimonialRecord>, TestimonialError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }
    let mut carousel = Carousel::new(records.len(), count, Duration::ZERO)?;
    carousel.jump(position % records.len())?;
    Ok(carousel.visible(records))
}

#[cfg(test)]
#[path = "testimonials_test.rs"]
mod tests;
