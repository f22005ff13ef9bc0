//! UI panel rendering subsystem
//!
//! - Header panel (dataset controls, tuning)
//! - Table panel (spacer-padded virtual table)
//! - Status bar (window and fetch counters)
//! - Panel manager (panel orchestration and layout)

pub mod header;
pub mod table_panel;
pub mod status_bar;
pub mod panel_manager;
