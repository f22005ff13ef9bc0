//! Panel orchestration and layout management.

use crate::app::AppState;
use crate::io::AsyncFetcher;
use crate::ui::{header, status_bar, table_panel};
use serde_json::Value;
use std::path::PathBuf;
use vtable::VtableConfig;

/// Result of panel interactions that need to be handled by the application coordinator.
pub enum PanelInteraction {
    OpenDatasetRequested(PathBuf),
    SyntheticRequested(usize),
    TuningChanged(VtableConfig),
    /// The table reported its scroll offset and viewport height this frame
    TableMeasured { scroll_offset: f32, viewport_height: f32 },
}

/// Manages the layout and rendering of all UI panels.
pub struct PanelManager;

impl PanelManager {
    /// Renders all panels, returning every interaction of this frame in order.
    pub fn render_all_panels(
        ctx: &egui::Context,
        state: &mut AppState,
        fetcher: &AsyncFetcher<Value>,
    ) -> Vec<PanelInteraction> {
        let mut interactions = Vec::new();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            if let Some(header_interaction) = header::render_header(ui, state) {
                interactions.push(match header_interaction {
                    header::HeaderInteraction::OpenDatasetRequested(path) => {
                        PanelInteraction::OpenDatasetRequested(path)
                    }
                    header::HeaderInteraction::SyntheticRequested(count) => {
                        PanelInteraction::SyntheticRequested(count)
                    }
                    header::HeaderInteraction::TuningChanged(tuning) => {
                        PanelInteraction::TuningChanged(tuning)
                    }
                });
            }
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            status_bar::render_status_bar(ui, state, fetcher);
        });

        let table_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(4))
            .fill(ctx.style().visuals.panel_fill);

        egui::CentralPanel::default()
            .frame(table_frame)
            .show(ctx, |ui| {
                if let Some(geometry) = table_panel::render_table_panel(ui, state) {
                    interactions.push(PanelInteraction::TableMeasured {
                        scroll_offset: geometry.scroll_offset,
                        viewport_height: geometry.viewport_height,
                    });
                }
            });

        interactions
    }
}
