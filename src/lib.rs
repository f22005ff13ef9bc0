pub mod error;
pub mod window;
pub mod calculator;
pub mod coalesce;
pub mod pagination;
pub mod traits;
pub mod memory_source;
pub mod list_view;
pub mod config;
pub mod logging;

// Export window planning
pub use window::{plan_window, rows_per_page, total_pages, ViewportState, WindowKey, WindowPlan};
pub use calculator::{FetchTicket, WindowCalculator, WindowDecision};
pub use coalesce::ScrollCoalescer;

// Export paging wire model and sources
pub use pagination::{PageMeta, PageRequest, PageResponse};
pub use traits::PageSource;
pub use memory_source::MemorySource;

// Export list view glue
pub use list_view::{fetch_blocking, Completion, FetchOrder, ListView, RenderedWindow};

pub use config::{VtableConfig, DEFAULT_CONFIG};
pub use error::{ConfigError, PagingError, ViewportError};
