//! Swipe-to-call gesture.
//!
//! The handle sits at the left of a fixed track. Dragging moves it right,
//! clamped to the track; releasing past the halfway mark fires the call once
//! and holds the control inert for a cool-down before it springs back.
//! Anything short of halfway snaps back without firing.
//!
//! ```text
//!   Idle --press--> Dragging --release >= 50%--> Cooldown --tick--> Idle
//!                      |
//!                      +----release < 50%-----------------------> Idle
//! ```

#[cfg(test)]
#[path = "swipe_test.rs"]
mod swipe_test;

use std::time::Duration;

pub const DEFAULT_TRACK_WIDTH: f64 = 180.0;
pub const DEFAULT_HANDLE_WIDTH: f64 = 40.0;
pub const DEFAULT_TRACK_PADDING: f64 = 8.0;
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5);

/// Fraction of the drag range the handle must reach to fire. Inclusive.
pub const FIRE_THRESHOLD: f64 = 0.5;

/// Track dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub track_width: f64,
    pub handle_width: f64,
    pub padding: f64,
}

impl TrackGeometry {
    /// Furthest the handle can travel from the start position.
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        (self.track_width - self.handle_width - self.padding).max(0.0)
    }
}

impl Default for TrackGeometry {
    fn default() -> Self {
        Self { track_width: DEFAULT_TRACK_WIDTH, handle_width: DEFAULT_HANDLE_WIDTH, padding: DEFAULT_TRACK_PADDING }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeState {
    /// Handle at rest at offset 0.
    Idle,
    /// Pointer is down and moving the handle.
    Dragging { offset: f64 },
    /// Call fired; ignoring input until `remaining` runs out.
    Cooldown { offset: f64, remaining: Duration },
}

/// What a release did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Threshold reached; the host should open `dial_uri`.
    Fired { dial_uri: String },
    /// Released short of the threshold; handle returned to 0.
    SnappedBack,
    /// No drag was in progress.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct SwipeToCall {
    geometry: TrackGeometry,
    cooldown: Duration,
    dial_uri: String,
    state: SwipeState,
}

impl SwipeToCall {
    #[must_use]
    pub fn new(geometry: TrackGeometry, dial_uri: impl Into<String>) -> Self {
        Self { geometry, cooldown: DEFAULT_COOLDOWN, dial_uri: dial_uri.into(), state: SwipeState::Idle }
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn state(&self) -> SwipeState {
        self.state
    }

    #[must_use]
    pub fn dial_uri(&self) -> &str {
        &self.dial_uri
    }

    /// Current handle offset in pixels.
    #[must_use]
    pub fn offset(&self) -> f64 {
        match self.state {
            SwipeState::Idle => 0.0,
            SwipeState::Dragging { offset } | SwipeState::Cooldown { offset, .. } => offset,
        }
    }

    /// Offset as a fraction of the drag range, for fading the label.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let max = self.geometry.max_offset();
        if max <= 0.0 { 0.0 } else { self.offset() / max }
    }

    #[must_use]
    pub fn is_inert(&self) -> bool {
        matches!(self.state, SwipeState::Cooldown { .. })
    }

    /// Pointer down on the handle. Returns `false` if the control is busy.
    pub fn press(&mut self) -> bool {
        if !matches!(self.state, SwipeState::Idle) {
            return false;
        }
        self.state = SwipeState::Dragging { offset: 0.0 };
        true
    }

    /// Pointer moved to `dx` pixels right of where the drag started.
    /// Returns the clamped offset actually applied.
    pub fn drag_to(&mut self, dx: f64) -> f64 {
        let SwipeState::Dragging { .. } = self.state else {
            return self.offset();
        };
        let offset = if dx.is_nan() { 0.0 } else { dx.clamp(0.0, self.geometry.max_offset()) };
        self.state = SwipeState::Dragging { offset };
        offset
    }

    /// Pointer up. Fires at most once per gesture.
    ///
    /// A track with no drag range can never fire.
    pub fn release(&mut self) -> SwipeOutcome {
        let SwipeState::Dragging { offset } = self.state else {
            return SwipeOutcome::Ignored;
        };
        let max = self.geometry.max_offset();
        if max > 0.0 && offset >= max * FIRE_THRESHOLD {
            self.state = SwipeState::Cooldown { offset, remaining: self.cooldown };
            SwipeOutcome::Fired { dial_uri: self.dial_uri.clone() }
        } else {
            self.state = SwipeState::Idle;
            SwipeOutcome::SnappedBack
        }
    }

    /// Report elapsed time. Returns `true` when the cool-down ends and the
    /// handle is reset.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let SwipeState::Cooldown { offset, remaining } = self.state else {
            return false;
        };
        let remaining = remaining.saturating_sub(dt);
        if remaining.is_zero() {
            self.state = SwipeState::Idle;
            true
        } else {
            self.state = SwipeState::Cooldown { offset, remaining };
            false
        }
    }
}
