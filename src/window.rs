//! Viewport window planning.
//!
//! Converts a [`ViewportState`] snapshot into the range of server pages that
//! must be fetched and the spacer padding that keeps the scrollbar the size of
//! the full list. Everything here is pure; memoization lives in
//! [`crate::calculator`].

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::ViewportError;

/// Immutable snapshot of a list viewport, taken on scroll, resize or mount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Total rows reported by the last fetched page's metadata
    pub total_rows: u64,
    /// Height of a single rendered row in pixels
    pub row_height_px: f64,
    /// Height of the visible scroll area in pixels
    pub viewport_height_px: f64,
    /// Current vertical scroll offset in pixels
    pub scroll_px: f64,
    /// Pages to fetch starting at the first page of the window
    pub cache_radius_pages: u32,
}

impl ViewportState {
    pub fn new(
        total_rows: u64,
        row_height_px: f64,
        viewport_height_px: f64,
        scroll_px: f64,
        cache_radius_pages: u32,
    ) -> Self {
        Self {
            total_rows,
            row_height_px,
            viewport_height_px,
            scroll_px,
            cache_radius_pages,
        }
    }

    /// Returns a copy scrolled to `scroll_px`.
    pub fn scrolled_to(self, scroll_px: f64) -> Self {
        Self { scroll_px, ..self }
    }

    /// Rejects negative or non-finite numbers and a zero cache radius.
    pub fn validate(&self) -> Result<(), ViewportError> {
        check_non_negative("row_height_px", self.row_height_px)?;
        check_non_negative("viewport_height_px", self.viewport_height_px)?;
        check_non_negative("scroll_px", self.scroll_px)?;
        if self.cache_radius_pages == 0 {
            return Err(ViewportError::invalid("cache_radius_pages", 0.0));
        }
        Ok(())
    }

    /// True when either height is zero, so no row can be placed.
    pub fn is_degenerate(&self) -> bool {
        self.row_height_px == 0.0 || self.viewport_height_px == 0.0
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ViewportError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ViewportError::invalid(field, value));
    }
    Ok(())
}

/// The (first page, page count, rows per page) triple that identifies a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowKey {
    pub first_page: u64,
    pub page_count: u64,
    pub rows_per_page: u64,
}

/// Pages to fetch and spacer heights to reserve for one viewport snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowPlan {
    /// First page to fetch (1-based)
    pub first_page: u64,
    /// Number of consecutive pages to fetch
    pub page_count: u64,
    /// Rows in each fetched page
    pub rows_per_page: u64,
    /// Spacer height above the rendered rows
    pub top_padding_px: f64,
    /// Spacer height below the rendered rows
    pub bottom_padding_px: f64,
}

impl WindowPlan {
    /// A plan for the given pages with no padding computed yet.
    pub fn new(first_page: u64, page_count: u64, rows_per_page: u64) -> Self {
        Self {
            first_page: first_page.max(1),
            page_count: page_count.max(1),
            rows_per_page: rows_per_page.max(1),
            top_padding_px: 0.0,
            bottom_padding_px: 0.0,
        }
    }

    /// The no-op plan: a single page and no padding.
    pub fn empty(rows_per_page: u64) -> Self {
        Self::new(1, 1, rows_per_page)
    }

    pub fn key(&self) -> WindowKey {
        WindowKey {
            first_page: self.first_page,
            page_count: self.page_count,
            rows_per_page: self.rows_per_page,
        }
    }

    /// Page just past the fetched window (`first_page + page_count`).
    pub fn last_page(&self) -> u64 {
        self.first_page.saturating_add(self.page_count)
    }

    /// Inclusive range of pages to request.
    pub fn page_range(&self) -> RangeInclusive<u64> {
        self.first_page..=self.last_page() - 1
    }

    /// Zero-based index of the first fetched row.
    pub fn first_row(&self) -> u64 {
        (self.first_page - 1).saturating_mul(self.rows_per_page)
    }

    /// Recomputes both spacers for `total_rows`.
    ///
    /// Called again on fetch completion, when the response metadata may carry
    /// a different row total than the one the window was planned with.
    pub fn with_total_rows(self, total_rows: u64, row_height_px: f64) -> Self {
        let rows_above = self.first_row();
        let rows_below =
            total_rows.saturating_sub(self.last_page().saturating_mul(self.rows_per_page));
        Self {
            top_padding_px: rows_above as f64 * row_height_px,
            bottom_padding_px: rows_below as f64 * row_height_px,
            ..self
        }
    }

    /// Full scroll height the spacers emulate.
    pub fn scroll_height_px(total_rows: u64, row_height_px: f64) -> f64 {
        total_rows as f64 * row_height_px
    }
}

/// Rows per page for a viewport: enough rows to fill it, times `multiplier`.
pub fn rows_per_page(viewport_height_px: f64, row_height_px: f64, multiplier: u32) -> u64 {
    if row_height_px <= 0.0 {
        return u64::from(multiplier.max(1));
    }
    let rows = (viewport_height_px / row_height_px).ceil() as u64;
    rows.max(1).saturating_mul(u64::from(multiplier.max(1)))
}

/// Number of pages holding `total_rows`, never less than one.
pub fn total_pages(total_rows: u64, rows_per_page: u64) -> u64 {
    total_rows.div_ceil(rows_per_page.max(1)).max(1)
}

/// Plans the fetch window for `state`.
///
/// The window starts one page before the page under the scroll position, so
/// scrolling back a little needs no refetch, and covers
/// `cache_radius_pages` pages. Scrolling past the content is clamped to the
/// last page. Pages past the end are still requested; the row source stops
/// at the end of the list.
pub fn plan_window(state: &ViewportState, multiplier: u32) -> Result<WindowPlan, ViewportError> {
    state.validate()?;
    if multiplier == 0 {
        return Err(ViewportError::invalid("rows_per_page_multiplier", 0.0));
    }

    if state.is_degenerate() {
        return Ok(WindowPlan::empty(1));
    }

    let rows_per_page = rows_per_page(state.viewport_height_px, state.row_height_px, multiplier);
    if state.total_rows == 0 {
        return Ok(WindowPlan::empty(rows_per_page));
    }

    let total = state.total_rows as f64;
    let scroll_height = WindowPlan::scroll_height_px(state.total_rows, state.row_height_px);
    let proportion = if scroll_height > 0.0 {
        (state.scroll_px / scroll_height).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let target_row = proportion * total;
    // The cast saturates for huge lists
    let page_to_show = ((target_row / rows_per_page as f64).floor() as u64).saturating_add(1);

    let pages = total_pages(state.total_rows, rows_per_page);
    let first_page = page_to_show.saturating_sub(1).clamp(1, pages);
    let page_count = u64::from(state.cache_radius_pages);

    Ok(WindowPlan::new(first_page, page_count, rows_per_page)
        .with_total_rows(state.total_rows, state.row_height_px))
}
