//! Application-level modules for the viewer.
//!
//! This module contains the application coordinator and centralized state.

mod app_state;
mod application_coordinator;
mod settings_coordinator;

pub use app_state::{AppState, DEFAULT_ROW_HEIGHT};
pub use application_coordinator::ApplicationCoordinator;
pub use settings_coordinator::SettingsCoordinator;
