//! Scroll event coalescing.
//!
//! Scroll listeners fire far more often than pages need refetching. The
//! coalescer keeps only the newest viewport snapshot and hands it out once the
//! viewport has been quiet for the debounce period. Each noted event bumps a
//! generation counter, so a callback scheduled for an older event can tell it
//! has been superseded.

use std::time::{Duration, Instant};

use crate::window::ViewportState;

#[derive(Debug, Clone)]
pub struct ScrollCoalescer {
    debounce: Duration,
    pending: Option<ViewportState>,
    last_event: Option<Instant>,
    generation: u64,
}

impl ScrollCoalescer {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
            last_event: None,
            generation: 0,
        }
    }

    /// Records a viewport change at `now`, replacing any pending snapshot.
    ///
    /// Returns the generation assigned to this event.
    pub fn note(&mut self, state: ViewportState, now: Instant) -> u64 {
        self.generation += 1;
        self.pending = Some(state);
        self.last_event = Some(now);
        self.generation
    }

    /// Hands out the pending snapshot once `debounce` has passed since the
    /// most recent event. Each snapshot is handed out at most once.
    pub fn poll(&mut self, now: Instant) -> Option<ViewportState> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.last_event = None;
        self.pending.take()
    }

    /// Hands out the pending snapshot without waiting (mount, resize).
    pub fn flush(&mut self) -> Option<ViewportState> {
        self.last_event = None;
        self.pending.take()
    }

    /// When the pending snapshot becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.last_event.map(|at| at + self.debounce)
    }

    pub fn pending(&self) -> Option<&ViewportState> {
        self.pending.as_ref()
    }

    /// True if no event was noted after the one that got `generation`.
    pub fn is_latest(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }
}
