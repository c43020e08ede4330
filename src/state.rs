//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the assistant (provider client plus credential ring), the booking
//! store, the testimonial list loaded at startup, and the inbound limiter.
//! Everything except the limiter is immutable after startup.

use std::sync::Arc;

use crate::rate_limit::RateLimiter;
use crate::services::assistant::Assistant;
use crate::services::booking::BookingStore;
use crate::services::testimonials::TestimonialRecord;

/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub bookings: Arc<dyn BookingStore>,
    pub testimonials: Arc<[TestimonialRecord]>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    #[must_use]
    pub fn new(
        assistant: Assistant,
        bookings: Arc<dyn BookingStore>,
        testimonials: Vec<TestimonialRecord>,
        rate_limiter: RateLimiter,
    ) -> Self {
        Self { assistant: Arc::new(assistant), bookings, testimonials: testimonials.into(), rate_limiter }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
#[path = "state_helpers_test.rs"]
pub mod test_helpers;
