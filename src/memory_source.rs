//! In-memory row source with the list endpoint's paging behaviour.
//!
//! Used by the viewer and the scroll generator in place of a real server, and
//! by tests. Rows are either supplied directly, loaded from a JSON array file,
//! or generated from a seed.

use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::fs;
use std::path::Path;

use crate::pagination::{PageMeta, PageRequest, PageResponse};
use crate::traits::PageSource;
use crate::window::total_pages;

const DEFAULT_SEED: u64 = 42;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "Diego", "Elena", "Fabio", "Gema", "Hugo", "Irene", "Jorge",
];

const LAST_NAMES: &[&str] = &[
    "Alonso", "Blanco", "Castro", "Delgado", "Esteban", "Ferrer", "Gil", "Herrera",
];

const STATUSES: &[&str] = &["active", "pending", "archived", "blocked"];

/// Row source backed by a `Vec`.
#[derive(Debug, Clone)]
pub struct MemorySource<R> {
    rows: Vec<R>,
}

impl<R> MemorySource<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }
}

impl MemorySource<serde_json::Value> {
    /// Generates `count` reproducible contact-like rows.
    pub fn synthetic(count: usize) -> Self {
        Self::synthetic_with_seed(count, DEFAULT_SEED)
    }

    pub fn synthetic_with_seed(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let rows = (0..count)
            .map(|index| {
                let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
                let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
                json!({
                    "id": index as u64 + 1,
                    "name": format!("{} {}", first, last),
                    "status": STATUSES[rng.gen_range(0..STATUSES.len())],
                    "balance": rng.gen_range(-5_000..50_000),
                })
            })
            .collect();
        Self::new(rows)
    }

    /// Loads rows from a file holding a JSON array.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let rows: Vec<serde_json::Value> = serde_json::from_str(&text)
            .with_context(|| format!("{} is not a JSON array of rows", path.display()))?;
        Ok(Self::new(rows))
    }

    /// Writes rows as a JSON array.
    pub fn write_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(&self.rows)?;
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
    }
}

impl<R: Clone + Send + Sync> PageSource for MemorySource<R> {
    type Row = R;

    /// Serves `pages_to_bring` pages from `page` on, stopping at the first
    /// page past the end. A single-page request past the end gets the last
    /// page instead, so a shrunken list never comes back blank.
    fn fetch(&self, request: &PageRequest) -> anyhow::Result<PageResponse<R>> {
        request.validate()?;

        let row_total = self.rows.len() as u64;
        let per_page = request.rowsperpage;
        let pages = total_pages(row_total, per_page);
        let first = request.page.max(1);

        let mut rows = Vec::new();
        for page in first..first.saturating_add(request.pages_to_bring) {
            if page > pages {
                if request.pages_to_bring == 1 {
                    rows.extend_from_slice(self.page_rows(pages, per_page));
                }
                break;
            }
            rows.extend_from_slice(self.page_rows(page, per_page));
        }

        Ok(PageResponse {
            meta: PageMeta::compute(row_total, per_page, first, request.pages_to_bring),
            rows,
        })
    }
}

impl<R> MemorySource<R> {
    fn page_rows(&self, page: u64, per_page: u64) -> &[R] {
        let len = self.rows.len();
        let start = usize::try_from((page - 1).saturating_mul(per_page))
            .unwrap_or(usize::MAX)
            .min(len);
        let end = usize::try_from(page.saturating_mul(per_page))
            .unwrap_or(usize::MAX)
            .min(len);
        &self.rows[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(count: u64) -> MemorySource<u64> {
        MemorySource::new((0..count).collect())
    }

    #[test]
    fn test_single_page() {
        let response = numbers(95)
            .fetch(&PageRequest { page: 2, pages_to_bring: 1, rowsperpage: 10 })
            .unwrap();
        assert_eq!(response.rows, (10..20).collect::<Vec<_>>());
        assert_eq!(response.meta.row_total, 95);
        assert_eq!(response.meta.start_register, 11);
    }

    #[test]
    fn test_several_pages_are_concatenated() {
        let response = numbers(95)
            .fetch(&PageRequest { page: 3, pages_to_bring: 3, rowsperpage: 10 })
            .unwrap();
        assert_eq!(response.rows, (20..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_stops_at_end_of_list() {
        let response = numbers(95)
            .fetch(&PageRequest { page: 9, pages_to_bring: 4, rowsperpage: 10 })
            .unwrap();
        assert_eq!(response.rows, (80..95).collect::<Vec<_>>());
    }

    #[test]
    fn test_single_page_past_end_serves_last_page() {
        let response = numbers(95)
            .fetch(&PageRequest { page: 40, pages_to_bring: 1, rowsperpage: 10 })
            .unwrap();
        assert_eq!(response.rows, (90..95).collect::<Vec<_>>());
        assert_eq!(response.meta.pagenumber, 10);
    }

    #[test]
    fn test_multi_page_past_end_is_empty() {
        let response = numbers(95)
            .fetch(&PageRequest { page: 40, pages_to_bring: 2, rowsperpage: 10 })
            .unwrap();
        assert!(response.rows.is_empty());
    }

    #[test]
    fn test_empty_source() {
        let response = numbers(0).fetch(&PageRequest::initial(10)).unwrap();
        assert!(response.rows.is_empty());
        assert_eq!(response.meta.row_total, 0);
    }

    #[test]
    fn test_invalid_request_rejected() {
        let result = numbers(10).fetch(&PageRequest { page: 1, pages_to_bring: 1, rowsperpage: 0 });
        assert!(result.is_err());
    }

    #[test]
    fn test_synthetic_is_reproducible() {
        let a = MemorySource::synthetic(50);
        let b = MemorySource::synthetic(50);
        assert_eq!(a.rows(), b.rows());
        assert_eq!(a.rows()[0]["id"], 1);
        assert_eq!(a.rows()[49]["id"], 50);
    }
}
