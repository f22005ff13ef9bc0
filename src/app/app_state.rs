//! Centralized state for the viewer.

use serde_json::Value;
use std::sync::Arc;
use vtable::{ListView, MemorySource, VtableConfig};

pub const DEFAULT_ROW_HEIGHT: f32 = 24.0;

/// Viewport height assumed until the first frame measures the real one.
const INITIAL_VIEWPORT_HEIGHT: f32 = 600.0;

/// Counters shown in the status bar.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchStats {
    pub issued: u64,
    pub applied: u64,
    pub stale: u64,
    pub failed: u64,
}

/// Main application state.
pub struct AppState {
    /// Windowing state of the one list on screen
    pub view: ListView<Value>,

    /// Row source backing the list, if a dataset is open
    pub source: Option<Arc<MemorySource<Value>>>,

    /// Human-readable name of the open dataset
    pub dataset_label: String,

    /// Column keys taken from the first row
    pub columns: Vec<String>,

    pub tuning: VtableConfig,
    pub row_height: f32,
    pub latency_ms: u64,
    pub stats: FetchStats,

    /// Current error message to display (if any)
    pub error_message: Option<String>,
}

impl AppState {
    pub fn new(tuning: VtableConfig, row_height: f32, latency_ms: u64) -> Self {
        Self {
            view: ListView::new(&tuning, f64::from(row_height), f64::from(INITIAL_VIEWPORT_HEIGHT)),
            source: None,
            dataset_label: String::new(),
            columns: Vec::new(),
            tuning,
            row_height,
            latency_ms,
            stats: FetchStats::default(),
            error_message: None,
        }
    }

    /// Replaces the list view, keeping the last measured viewport height.
    pub fn rebuild_view(&mut self) {
        let viewport = self.view.viewport_height_px();
        self.view.teardown();
        self.view = ListView::new(&self.tuning, f64::from(self.row_height), viewport);
        self.stats = FetchStats::default();
    }

    /// Installs a new dataset and derives its columns.
    pub fn load_source(&mut self, source: MemorySource<Value>, label: String) {
        self.columns = source
            .rows()
            .first()
            .and_then(Value::as_object)
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        self.source = Some(Arc::new(source));
        self.dataset_label = label;
        self.error_message = None;
        self.rebuild_view();
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(VtableConfig::default(), DEFAULT_ROW_HEIGHT, 0)
    }
}
