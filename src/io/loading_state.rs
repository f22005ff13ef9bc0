//! Shared background fetch counter.

/// Fetch bookkeeping shared between the GUI thread and fetch threads.
///
/// Only the in-flight count is shared; results come through a channel.
/// Wrapped in an `Arc<Mutex<>>`.
pub struct LoadingState {
    /// Fetches started but not yet finished
    pub in_flight: usize,
}

impl LoadingState {
    pub fn new() -> Self {
        Self { in_flight: 0 }
    }
}

impl Default for LoadingState {
    fn default() -> Self {
        Self::new()
    }
}
