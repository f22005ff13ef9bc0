//! I/O modules for page fetching and dataset loading.

pub mod loading_state;
pub mod async_fetcher;

// Re-export commonly used types
pub use loading_state::LoadingState;
pub use async_fetcher::{AsyncFetcher, FetchResult};
