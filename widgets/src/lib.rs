//! UI-local state machines for the clinic site.
//!
//! Every widget on the page that holds state between events lives here as a
//! plain struct driven by explicit method calls. Nothing in this crate touches
//! the network, a timer, or the DOM: the host feeds in pointer positions and
//! elapsed time, and reads back what should be shown. That keeps the behavior
//! testable without a browser and shareable between the server and the CLI.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`chat`] | Conversation turns, the append-only transcript, chat panel state |
//! | [`carousel`] | Testimonial rotation with a wrapping sliding window |
//! | [`swipe`] | Swipe-to-call drag gesture with a post-fire cool-down |
//! | [`booking`] | Booking modal form fields and submit status |

pub mod booking;
pub mod carousel;
pub mod chat;
pub mod swipe;
