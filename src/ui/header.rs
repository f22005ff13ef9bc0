//! Header panel UI rendering
//!
//! Dataset controls and windowing tuning.

use crate::app::AppState;
use eframe::egui;
use std::path::PathBuf;
use vtable::VtableConfig;

const SYNTHETIC_SIZES: &[usize] = &[1_000, 10_000, 100_000];

/// Result of user interaction with the header panel
pub enum HeaderInteraction {
    /// User picked a JSON dataset file
    OpenDatasetRequested(PathBuf),
    /// User asked for a generated dataset of this many rows
    SyntheticRequested(usize),
    /// Tuning, row height or latency changed; the list must be rebuilt
    TuningChanged(VtableConfig),
}

pub fn render_header(ui: &mut egui::Ui, state: &mut AppState) -> Option<HeaderInteraction> {
    let mut interaction = None;

    ui.horizontal(|ui| {
        if ui.button("📁 Open Dataset").clicked() {
            let mut dialog = rfd::FileDialog::new().add_filter("JSON rows", &["json"]);
            if let Ok(cwd) = std::env::current_dir() {
                dialog = dialog.set_directory(cwd);
            }
            if let Some(path) = dialog.pick_file() {
                interaction = Some(HeaderInteraction::OpenDatasetRequested(path));
            }
        }

        for &size in SYNTHETIC_SIZES {
            if ui.button(format!("🔮 {} rows", size)).clicked() {
                interaction = Some(HeaderInteraction::SyntheticRequested(size));
            }
        }

        ui.separator();

        let mut tuning = state.tuning.clone();
        let mut changed = false;

        ui.label("Page ×");
        changed |= ui
            .add(egui::DragValue::new(&mut tuning.rows_per_page_multiplier).range(1..=8))
            .changed();

        ui.label("Cache pages");
        changed |= ui
            .add(egui::DragValue::new(&mut tuning.cache_radius_pages).range(1..=16))
            .changed();

        ui.label("Debounce ms");
        changed |= ui
            .add(egui::DragValue::new(&mut tuning.debounce_ms).range(0..=2000))
            .changed();

        ui.separator();

        ui.label("Row px");
        changed |= ui
            .add(egui::DragValue::new(&mut state.row_height).range(12.0..=64.0))
            .changed();

        ui.label("Latency ms");
        changed |= ui
            .add(egui::DragValue::new(&mut state.latency_ms).range(0..=3000))
            .changed();

        if changed && interaction.is_none() {
            interaction = Some(HeaderInteraction::TuningChanged(tuning));
        }
    });

    interaction
}
