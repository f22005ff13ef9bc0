//! Background page fetching.
//!
//! Each fetch runs on its own thread and reports back through one shared
//! channel, so the GUI thread never blocks on the row source. Fetches are not
//! cancelled when superseded; their results still arrive and the list view
//! drops them by ticket.

use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::debug;
use vtable::{FetchOrder, FetchTicket, PageResponse, PageSource};

use crate::io::LoadingState;

type FetchMessage<R> = (Option<FetchTicket>, Result<PageResponse<R>, String>);

/// Result of one completed fetch.
pub enum FetchResult<R> {
    Success {
        ticket: Option<FetchTicket>,
        response: PageResponse<R>,
    },
    Error(String),
}

/// Runs page fetches off the GUI thread.
pub struct AsyncFetcher<R> {
    /// Number of fetches still running
    loading_state: Arc<Mutex<LoadingState>>,
    sender: Sender<FetchMessage<R>>,
    receiver: Receiver<FetchMessage<R>>,
    /// Artificial delay added to every fetch, to make in-flight superseding visible
    latency: Duration,
}

impl<R: Send + 'static> AsyncFetcher<R> {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            loading_state: Arc::new(Mutex::new(LoadingState::new())),
            sender,
            receiver,
            latency: Duration::ZERO,
        }
    }

    pub fn set_latency(&mut self, latency: Duration) {
        self.latency = latency;
    }

    /// True while any fetch is still running.
    pub fn is_loading(&self) -> bool {
        self.loading_state
            .lock()
            .map(|state| state.in_flight > 0)
            .unwrap_or(false)
    }

    pub fn in_flight(&self) -> usize {
        self.loading_state.lock().map(|state| state.in_flight).unwrap_or(0)
    }

    /// Starts `order` against `source` on a background thread.
    ///
    /// `ctx` is asked to repaint once the result is queued.
    pub fn start_fetch<S>(&self, source: Arc<S>, order: FetchOrder, ctx: &egui::Context)
    where
        S: PageSource<Row = R> + 'static,
    {
        if let Ok(mut state) = self.loading_state.lock() {
            state.in_flight += 1;
        }

        let loading_state = Arc::clone(&self.loading_state);
        let sender = self.sender.clone();
        let ctx_handle = ctx.clone();
        let latency = self.latency;

        debug!(request = ?order.request, "starting background fetch");
        thread::spawn(move || {
            if !latency.is_zero() {
                thread::sleep(latency);
            }

            let result = source.fetch(&order.request).map_err(|e| e.to_string());
            let _ = sender.send((order.ticket, result));

            if let Ok(mut state) = loading_state.lock() {
                state.in_flight = state.in_flight.saturating_sub(1);
            }

            ctx_handle.request_repaint();
        });
    }

    /// Drains every fetch that finished since the last call.
    ///
    /// Called once per frame.
    pub fn check_completion(&mut self) -> Vec<FetchResult<R>> {
        self.receiver
            .try_iter()
            .map(|(ticket, result)| match result {
                Ok(response) => FetchResult::Success { ticket, response },
                Err(error_msg) => FetchResult::Error(error_msg),
            })
            .collect()
    }
}

impl<R: Send + 'static> Default for AsyncFetcher<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use vtable::{MemorySource, PageRequest};

    fn wait_for<R: Send + 'static>(fetcher: &mut AsyncFetcher<R>) -> Vec<FetchResult<R>> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let results = fetcher.check_completion();
            if !results.is_empty() || Instant::now() > deadline {
                return results;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_fetcher_creation() {
        let fetcher: AsyncFetcher<u64> = AsyncFetcher::new();
        assert!(!fetcher.is_loading());
    }

    #[test]
    fn test_check_completion_when_idle() {
        let mut fetcher: AsyncFetcher<u64> = AsyncFetcher::new();
        assert!(fetcher.check_completion().is_empty());
    }

    #[test]
    fn test_background_fetch_delivers_rows() {
        let mut fetcher = AsyncFetcher::new();
        let source = Arc::new(MemorySource::new((0..50u64).collect()));
        let order = FetchOrder {
            ticket: None,
            request: PageRequest::initial(10),
        };

        fetcher.start_fetch(source, order, &egui::Context::default());
        let results = wait_for(&mut fetcher);

        assert_eq!(results.len(), 1);
        match &results[0] {
            FetchResult::Success { ticket, response } => {
                assert_eq!(*ticket, None);
                assert_eq!(response.rows, (0..10).collect::<Vec<_>>());
            }
            FetchResult::Error(e) => panic!("fetch failed: {}", e),
        }
    }

    #[test]
    fn test_background_fetch_reports_errors() {
        let mut fetcher = AsyncFetcher::new();
        let source = Arc::new(MemorySource::new((0..50u64).collect()));
        let order = FetchOrder {
            ticket: None,
            request: PageRequest { page: 1, pages_to_bring: 1, rowsperpage: 0 },
        };

        fetcher.start_fetch(source, order, &egui::Context::default());
        let results = wait_for(&mut fetcher);
        assert!(matches!(results.as_slice(), [FetchResult::Error(_)]));
    }
}
