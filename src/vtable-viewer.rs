//! Virtual Table Viewer
//!
//! Interactive demo of the vtable windowing engine built with egui. A large
//! list is served page by page from a background row source while the table
//! renders only the fetched window between two spacers.
//!
//! The application is built with a modular architecture:
//! - `app/` - Application state and coordination
//! - `io/` - Background page fetching
//! - `ui/` - Panel rendering

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Instant;

mod app;
mod io;
mod ui;

use app::{AppState, ApplicationCoordinator, SettingsCoordinator, DEFAULT_ROW_HEIGHT};
use io::AsyncFetcher;
use ui::panel_manager::{PanelInteraction, PanelManager};
use vtable::VtableConfig;

const TUNING_KEY: &str = "vtable_tuning";
const ROW_HEIGHT_KEY: &str = "row_height";
const LATENCY_KEY: &str = "fetch_latency_ms";

const DEFAULT_SYNTHETIC_ROWS: usize = 10_000;

/// Where the first dataset comes from.
enum InitialDataset {
    File(PathBuf),
    Synthetic(usize),
}

fn main() -> eframe::Result {
    vtable::logging::init_tracing();

    // A numeric argument generates that many rows; anything else is a dataset path
    let initial = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<usize>() {
            Ok(count) => InitialDataset::Synthetic(count),
            Err(_) => InitialDataset::File(PathBuf::from(arg)),
        },
        None => InitialDataset::Synthetic(DEFAULT_SYNTHETIC_ROWS),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_title("Virtual Table Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "Virtual Table Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, initial)))),
    )
}

struct ViewerApp {
    state: AppState,
    fetcher: AsyncFetcher<Value>,
    /// Dataset to open on the first frame
    pending_dataset: Option<InitialDataset>,
}

impl ViewerApp {
    /// Restores tuning from eframe storage, falling back to the config file.
    fn new(cc: &eframe::CreationContext, initial: InitialDataset) -> Self {
        let file_tuning = VtableConfig::load_or_default(VtableConfig::default_path().as_deref());
        let tuning = SettingsCoordinator::load_setting_or(cc.storage, TUNING_KEY, file_tuning);
        let row_height =
            SettingsCoordinator::load_setting_or(cc.storage, ROW_HEIGHT_KEY, DEFAULT_ROW_HEIGHT);
        let latency_ms: u64 = SettingsCoordinator::load_setting_or(cc.storage, LATENCY_KEY, 0);

        Self {
            state: AppState::new(tuning, row_height, latency_ms),
            fetcher: AsyncFetcher::new(),
            pending_dataset: Some(initial),
        }
    }

    fn handle_panel_interaction(&mut self, interaction: PanelInteraction, ctx: &egui::Context) {
        match interaction {
            PanelInteraction::OpenDatasetRequested(path) => {
                ApplicationCoordinator::open_dataset(&mut self.state, &mut self.fetcher, path, ctx);
            }
            PanelInteraction::SyntheticRequested(count) => {
                ApplicationCoordinator::open_synthetic(&mut self.state, &mut self.fetcher, count, ctx);
            }
            PanelInteraction::TuningChanged(tuning) => {
                ApplicationCoordinator::apply_tuning(&mut self.state, &mut self.fetcher, tuning, ctx);
            }
            PanelInteraction::TableMeasured {
                scroll_offset,
                viewport_height,
            } => {
                ApplicationCoordinator::handle_resize(&mut self.state, &self.fetcher, viewport_height, ctx);
                ApplicationCoordinator::handle_scroll(&mut self.state, scroll_offset, Instant::now());
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        SettingsCoordinator::save_setting(storage, TUNING_KEY, &self.state.tuning);
        SettingsCoordinator::save_setting(storage, ROW_HEIGHT_KEY, &self.state.row_height);
        SettingsCoordinator::save_setting(storage, LATENCY_KEY, &self.state.latency_ms);
    }

    /// 1. Apply finished fetches
    /// 2. Open the initial dataset (first frame only)
    /// 3. Render panels and handle their interactions
    /// 4. Run any debounced window recompute that is due
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ApplicationCoordinator::check_fetch_completion(&mut self.state, &mut self.fetcher, ctx);

        if let Some(initial) = self.pending_dataset.take() {
            match initial {
                InitialDataset::File(path) => {
                    ApplicationCoordinator::open_dataset(&mut self.state, &mut self.fetcher, path, ctx);
                }
                InitialDataset::Synthetic(count) => {
                    ApplicationCoordinator::open_synthetic(&mut self.state, &mut self.fetcher, count, ctx);
                }
            }
        }

        for interaction in PanelManager::render_all_panels(ctx, &mut self.state, &self.fetcher) {
            self.handle_panel_interaction(interaction, ctx);
        }

        ApplicationCoordinator::tick(&mut self.state, &self.fetcher, Instant::now(), ctx);
    }
}
