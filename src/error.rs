//! Error types for window planning, paging and configuration.

use std::path::PathBuf;

/// Rejected viewport input.
///
/// A zero row height or zero viewport height is not an error: it produces the
/// empty plan instead (see [`crate::window::plan_window`]).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewportError {
    /// A numeric field was negative, NaN or infinite, or a count was zero
    /// where at least one is required.
    #[error("invalid viewport state: {field} = {value}")]
    InvalidViewportState {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value, widened to f64 for reporting
        value: f64,
    },
}

impl ViewportError {
    pub(crate) fn invalid(field: &'static str, value: f64) -> Self {
        ViewportError::InvalidViewportState { field, value }
    }
}

/// Malformed page request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PagingError {
    #[error("rowsperpage must be at least 1")]
    ZeroRowsPerPage,

    #[error("pages_to_bring must be at least 1")]
    ZeroPagesToBring,
}

/// Failure to load, validate or store a [`crate::config::VtableConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}
