//! Application-level coordination between the UI, the list view and the
//! background fetcher.

use crate::app::AppState;
use crate::io::{AsyncFetcher, FetchResult};
use eframe::egui;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};
use vtable::{Completion, FetchOrder, MemorySource, VtableConfig};

/// Coordinates dataset loading, fetch dispatch and completion handling.
pub struct ApplicationCoordinator;

impl ApplicationCoordinator {
    /// Loads a JSON array of rows from disk and mounts it.
    pub fn open_dataset(
        state: &mut AppState,
        fetcher: &mut AsyncFetcher<Value>,
        path: PathBuf,
        ctx: &egui::Context,
    ) {
        match MemorySource::from_json_file(&path) {
            Ok(source) => {
                info!(path = %path.display(), rows = source.len(), "opened dataset");
                let label = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                state.load_source(source, label);
                Self::mount(state, fetcher, ctx);
            }
            Err(e) => {
                error!(error = %e, "failed to open dataset");
                state.error_message = Some(format!("Error loading dataset: {:#}", e));
            }
        }
    }

    /// Generates `count` rows in memory and mounts them.
    pub fn open_synthetic(
        state: &mut AppState,
        fetcher: &mut AsyncFetcher<Value>,
        count: usize,
        ctx: &egui::Context,
    ) {
        state.load_source(MemorySource::synthetic(count), format!("Synthetic ({} rows)", count));
        Self::mount(state, fetcher, ctx);
    }

    /// Rebuilds the list view with new tuning and remounts it.
    pub fn apply_tuning(
        state: &mut AppState,
        fetcher: &mut AsyncFetcher<Value>,
        tuning: VtableConfig,
        ctx: &egui::Context,
    ) {
        if let Err(e) = tuning.validate() {
            state.error_message = Some(e.to_string());
            return;
        }
        state.tuning = tuning;
        fetcher.set_latency(Duration::from_millis(state.latency_ms));
        state.rebuild_view();
        if state.has_source() {
            Self::mount(state, fetcher, ctx);
        }
    }

    fn mount(state: &mut AppState, fetcher: &mut AsyncFetcher<Value>, ctx: &egui::Context) {
        fetcher.set_latency(Duration::from_millis(state.latency_ms));
        match state.view.mount() {
            Ok(order) => Self::dispatch(state, fetcher, order, ctx),
            Err(e) => state.error_message = Some(e.to_string()),
        }
    }

    fn dispatch(
        state: &mut AppState,
        fetcher: &AsyncFetcher<Value>,
        order: FetchOrder,
        ctx: &egui::Context,
    ) {
        if let Some(source) = &state.source {
            fetcher.start_fetch(Arc::clone(source), order, ctx);
            state.stats.issued += 1;
        }
    }

    /// Applies every finished fetch. Called once per frame.
    pub fn check_fetch_completion(
        state: &mut AppState,
        fetcher: &mut AsyncFetcher<Value>,
        ctx: &egui::Context,
    ) {
        for result in fetcher.check_completion() {
            match result {
                FetchResult::Success { ticket, response } => {
                    match state.view.complete(ticket, response) {
                        Ok(Completion::Applied { follow_up }) => {
                            state.stats.applied += 1;
                            if let Some(order) = follow_up {
                                Self::dispatch(state, fetcher, order, ctx);
                            }
                        }
                        Ok(Completion::Stale) => state.stats.stale += 1,
                        Err(e) => state.error_message = Some(e.to_string()),
                    }
                }
                FetchResult::Error(error_msg) => {
                    state.stats.failed += 1;
                    state.error_message = Some(format!("Error fetching rows: {}", error_msg));
                }
            }
        }
    }

    /// Records the scroll offset reported by the table this frame.
    pub fn handle_scroll(state: &mut AppState, offset_y: f32, now: Instant) {
        if (f64::from(offset_y) - state.view.scroll_px()).abs() >= 0.5 {
            state.view.scrolled(f64::from(offset_y), now);
        }
    }

    /// Applies a changed viewport height right away.
    pub fn handle_resize(
        state: &mut AppState,
        fetcher: &AsyncFetcher<Value>,
        height: f32,
        ctx: &egui::Context,
    ) {
        if (f64::from(height) - state.view.viewport_height_px()).abs() < 0.5 {
            return;
        }
        match state.view.resized(f64::from(height)) {
            Ok(Some(order)) => Self::dispatch(state, fetcher, order, ctx),
            Ok(None) => {}
            Err(e) => state.error_message = Some(e.to_string()),
        }
    }

    /// Runs a debounced recompute if one is due, and schedules a repaint for
    /// the next deadline otherwise.
    pub fn tick(
        state: &mut AppState,
        fetcher: &AsyncFetcher<Value>,
        now: Instant,
        ctx: &egui::Context,
    ) {
        match state.view.poll(now) {
            Ok(Some(order)) => Self::dispatch(state, fetcher, order, ctx),
            Ok(None) => {}
            Err(e) => state.error_message = Some(e.to_string()),
        }

        if let Some(deadline) = state.view.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}
