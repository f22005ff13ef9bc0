//! Per-list tuning loaded from JSON.
//!
//! ```json
//! { "rows_per_page_multiplier": 1, "cache_radius_pages": 4, "debounce_ms": 300 }
//! ```
//!
//! Missing keys fall back to the defaults above.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ConfigError;

const CONFIG_DIR_NAME: &str = "vtable";
const CONFIG_FILE_NAME: &str = "config.json";

/// Defaults shared by every list that has no config of its own.
pub static DEFAULT_CONFIG: Lazy<VtableConfig> = Lazy::new(VtableConfig::default);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VtableConfig {
    /// Page size in viewports. 1 means many small fetches, larger values
    /// fewer but slower ones.
    pub rows_per_page_multiplier: u32,
    /// Pages fetched per window, counted from the lookback page.
    pub cache_radius_pages: u32,
    /// Quiet period after the last scroll event before recomputing.
    pub debounce_ms: u64,
}

impl Default for VtableConfig {
    fn default() -> Self {
        Self {
            rows_per_page_multiplier: 1,
            cache_radius_pages: 4,
            debounce_ms: 300,
        }
    }
}

impl VtableConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows_per_page_multiplier == 0 {
            return Err(ConfigError::Invalid(
                "rows_per_page_multiplier must be at least 1".to_string(),
            ));
        }
        if self.cache_radius_pages == 0 {
            return Err(ConfigError::Invalid(
                "cache_radius_pages must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// `<config dir>/vtable/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Reads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Like [`Self::load`], but a missing or broken file yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return DEFAULT_CONFIG.clone();
        };
        if !path.exists() {
            return DEFAULT_CONFIG.clone();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!(%err, "falling back to default config");
                DEFAULT_CONFIG.clone()
            }
        }
    }

    /// Writes the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_defaults() {
        let config = VtableConfig::default();
        assert_eq!(config.rows_per_page_multiplier, 1);
        assert_eq!(config.cache_radius_pages, 4);
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(*DEFAULT_CONFIG, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: VtableConfig = serde_json::from_str(r#"{"cache_radius_pages": 8}"#).unwrap();
        assert_eq!(config.cache_radius_pages, 8);
        assert_eq!(config.rows_per_page_multiplier, 1);
        assert_eq!(config.debounce_ms, 300);
    }

    #[test]
    fn test_zero_values_rejected() {
        let config = VtableConfig {
            cache_radius_pages: 0,
            ..VtableConfig::default()
        };
        assert!(config.validate().is_err());

        let config = VtableConfig {
            rows_per_page_multiplier: 0,
            ..VtableConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = env::temp_dir().join("vtable_config_test").join("config.json");
        let _ = fs::remove_file(&path);

        let config = VtableConfig {
            rows_per_page_multiplier: 2,
            cache_radius_pages: 6,
            debounce_ms: 120,
        };
        config.save(&path).unwrap();
        assert_eq!(VtableConfig::load(&path).unwrap(), config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let path = env::temp_dir().join("vtable_config_missing.json");
        let _ = fs::remove_file(&path);
        assert_eq!(VtableConfig::load_or_default(Some(&path)), VtableConfig::default());
        assert_eq!(VtableConfig::load_or_default(None), VtableConfig::default());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let path = env::temp_dir().join("vtable_config_broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(VtableConfig::load(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(VtableConfig::load_or_default(Some(&path)), VtableConfig::default());
        let _ = fs::remove_file(&path);
    }
}
