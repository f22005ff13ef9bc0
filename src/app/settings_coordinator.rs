//! Viewer preference persistence.
//!
//! Stores any serializable value as a JSON string in eframe's persistent
//! storage, so tuning and demo options survive restarts.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Coordinates settings persistence through eframe storage.
pub struct SettingsCoordinator;

impl SettingsCoordinator {
    /// Loads `key`, falling back to `default` when missing or unreadable.
    pub fn load_setting_or<T>(storage: Option<&dyn eframe::Storage>, key: &str, default: T) -> T
    where
        T: for<'de> Deserialize<'de>,
    {
        Self::try_load_setting(storage, key).unwrap_or(default)
    }

    /// Loads `key`, returning None if not found or invalid.
    pub fn try_load_setting<T>(storage: Option<&dyn eframe::Storage>, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let json_str = storage?.get_string(key)?;
        match serde_json::from_str(&json_str) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "ignoring unreadable setting");
                None
            }
        }
    }

    /// Saves `value` under `key` and flushes storage.
    pub fn save_setting<T>(storage: &mut dyn eframe::Storage, key: &str, value: &T)
    where
        T: Serialize,
    {
        match serde_json::to_string(value) {
            Ok(json_str) => {
                storage.set_string(key, json_str);
                storage.flush();
            }
            Err(err) => warn!(key, %err, "failed to serialize setting"),
        }
    }
}
