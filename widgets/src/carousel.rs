//! Testimonial rotation.
//!
//! A [`Carousel`] tracks a position into a fixed-length list and exposes a
//! wrapping window of `items_to_show` consecutive indices starting there. The
//! host drives auto-advance by reporting elapsed time through
//! [`Carousel::tick`]; hovering the region pauses it. Manual navigation takes
//! effect immediately and restarts the interval, so the next automatic step
//! is always a full interval after the last user action.

#[cfg(test)]
#[path = "carousel_test.rs"]
mod carousel_test;

use std::time::Duration;

/// Cards shown side by side.
pub const DEFAULT_ITEMS_TO_SHOW: usize = 3;
/// Time between automatic advances.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CarouselError {
    #[error("carousel needs at least one item")]
    Empty,
    #[error("index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    items_to_show: usize,
    position: usize,
    /// Zero disables auto-advance.
    interval: Duration,
    elapsed: Duration,
    hovering: bool,
}

impl Carousel {
    /// Build a carousel over `len` items.
    ///
    /// `items_to_show` is clamped to `1..=len` so the window never repeats an
    /// item.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::Empty`] when `len` is zero.
    pub fn new(len: usize, items_to_show: usize, interval: Duration) -> Result<Self, CarouselError> {
        if len == 0 {
            return Err(CarouselError::Empty);
        }
        Ok(Self {
            len,
            items_to_show: items_to_show.clamp(1, len),
            position: 0,
            interval,
            elapsed: Duration::ZERO,
            hovering: false,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn items_to_show(&self) -> usize {
        self.items_to_show
    }

    /// Whether auto-advance is currently held off by a hovering pointer.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.hovering
    }

    pub fn next(&mut self) {
        self.position = (self.position + 1) % self.len;
        self.elapsed = Duration::ZERO;
    }

    pub fn prev(&mut self) {
        self.position = (self.position + self.len - 1) % self.len;
        self.elapsed = Duration::ZERO;
    }

    /// Move straight to `index` (pagination dots).
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::IndexOutOfRange`] when `index >= len`; the
    /// position is left unchanged.
    pub fn jump(&mut self, index: usize) -> Result<(), CarouselError> {
        if index >= self.len {
            return Err(CarouselError::IndexOutOfRange { index, len: self.len });
        }
        self.position = index;
        self.elapsed = Duration::ZERO;
        Ok(())
    }

    pub fn pointer_enter(&mut self) {
        self.hovering = true;
    }

    /// Resume auto-advance with a fresh interval.
    pub fn pointer_leave(&mut self) {
        self.hovering = false;
        self.elapsed = Duration::ZERO;
    }

    /// Report elapsed time. Returns `true` if the position moved.
    ///
    /// A long gap advances once per whole interval that fit into it. A gap
    /// that lands on a whole number of laps leaves the position where it was.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.hovering || self.interval.is_zero() {
            return false;
        }
        let elapsed = self.elapsed.saturating_add(dt).as_nanos();
        let interval = self.interval.as_nanos();
        let steps = elapsed / interval;
        self.elapsed = Duration::from_nanos(u64::try_from(elapsed % interval).unwrap_or(0));
        if steps == 0 {
            return false;
        }
        let shift = usize::try_from(steps % self.len as u128).unwrap_or(0);
        self.position = (self.position + shift) % self.len;
        shift != 0
    }

    /// Indices currently visible, in display order.
    #[must_use]
    pub fn window(&self) -> Vec<usize> {
        (0..self.items_to_show)
            .map(|i| (self.position + i) % self.len)
            .collect()
    }

    /// Resolve the window against the backing list.
    #[must_use]
    pub fn visible<'a, T>(&self, items: &'a [T]) -> Vec<&'a T> {
        self.window()
            .into_iter()
            .filter_map(|i| items.get(i))
            .collect()
    }
}
