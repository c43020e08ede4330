//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation, provider calls and persistence so route
//! handlers can stay focused on protocol translation and rate limiting.

pub mod assistant;
pub mod booking;
pub mod clinic;
pub mod testimonials;
