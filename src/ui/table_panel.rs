//! Table panel UI rendering
//!
//! Draws the fetched rows between two spacers whose heights come from the
//! window plan, so the scrollbar spans the whole list while only a few pages
//! exist in memory.

use crate::app::AppState;
use eframe::egui;
use egui::{Align, Layout, RichText, ScrollArea};
use serde_json::Value;

const COLUMN_WIDTH: f32 = 160.0;

/// Geometry measured while drawing the table this frame.
pub struct TableGeometry {
    pub scroll_offset: f32,
    pub viewport_height: f32,
}

pub fn render_table_panel(ui: &mut egui::Ui, state: &AppState) -> Option<TableGeometry> {
    if !state.has_source() {
        ui.label("Open a dataset or generate one to start scrolling");
        return None;
    }

    render_column_header(ui, &state.columns);
    ui.separator();

    let row_height = state.row_height;
    let output = ScrollArea::vertical()
        .id_salt("vtable_scroll_area")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.spacing_mut().item_spacing.y = 0.0;

            let Some(window) = state.view.rendered() else {
                return;
            };

            let top_padding = window.plan.top_padding_px as f32;
            if top_padding > 0.0 {
                ui.add_space(top_padding);
            }

            for (index, row) in window.rows.iter().enumerate() {
                let row_number = window.first_row + index as u64 + 1;
                render_row(ui, row_number, row, &state.columns, row_height);
            }

            let bottom_padding = window.plan.bottom_padding_px as f32;
            if bottom_padding > 0.0 {
                ui.add_space(bottom_padding);
            }
        });

    Some(TableGeometry {
        scroll_offset: output.state.offset.y,
        viewport_height: output.inner_rect.height(),
    })
}

fn render_column_header(ui: &mut egui::Ui, columns: &[String]) {
    ui.horizontal(|ui| {
        ui.add_sized([60.0, 18.0], egui::Label::new(RichText::new("#").strong()));
        for column in columns {
            ui.add_sized([COLUMN_WIDTH, 18.0], egui::Label::new(RichText::new(column).strong()));
        }
    });
}

fn render_row(ui: &mut egui::Ui, row_number: u64, row: &Value, columns: &[String], height: f32) {
    let width = ui.available_width();
    ui.allocate_ui_with_layout(
        egui::vec2(width, height),
        Layout::left_to_right(Align::Center),
        |ui| {
            ui.set_min_height(height);
            ui.add_sized([60.0, height], egui::Label::new(row_number.to_string()));
            if columns.is_empty() {
                ui.label(cell_text(row));
                return;
            }
            for column in columns {
                let text = row.get(column).map(cell_text).unwrap_or_default();
                ui.add_sized([COLUMN_WIDTH, height], egui::Label::new(text).truncate());
            }
        },
    );
}

/// Display text for one cell: strings unquoted, everything else as JSON.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("Ana")), "Ana");
        assert_eq!(cell_text(&json!(12)), "12");
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
