//! Status bar UI rendering
//!
//! Shows the current window and fetch counters.

use crate::app::AppState;
use crate::io::AsyncFetcher;
use eframe::egui;
use egui::RichText;
use serde_json::Value;

pub fn render_status_bar(ui: &mut egui::Ui, state: &AppState, fetcher: &AsyncFetcher<Value>) {
    ui.horizontal(|ui| {
        if !state.has_source() {
            ui.label(RichText::new("No dataset loaded").strong());
            return;
        }

        ui.label(RichText::new(&state.dataset_label).strong());
        ui.label(RichText::new("|").strong());
        ui.label(format!("Rows: {}", state.view.total_rows()));

        if let Some(window) = state.view.rendered() {
            let plan = window.plan;
            let pages = plan.page_range();
            ui.label(RichText::new("|").strong());
            ui.label(format!(
                "Pages {}..={} × {} rows | Top {:.0}px | Bottom {:.0}px",
                pages.start(),
                pages.end(),
                plan.rows_per_page,
                plan.top_padding_px,
                plan.bottom_padding_px,
            ));
        }

        ui.label(RichText::new("|").strong());
        let stats = state.stats;
        ui.label(format!(
            "Gen {} | Fetches {} | Applied {} | Stale {} | Failed {}",
            state.view.generation(),
            stats.issued,
            stats.applied,
            stats.stale,
            stats.failed,
        ));

        if fetcher.is_loading() {
            ui.label(RichText::new("|").strong());
            ui.spinner();
            ui.label(format!("{} in flight", fetcher.in_flight()));
        }

        if let Some(error) = &state.error_message {
            ui.label(RichText::new("|").strong());
            ui.label(RichText::new(error).color(egui::Color32::RED));
        }
    });
}
