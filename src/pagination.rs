//! Wire model shared with the paginated row source.
//!
//! Field names follow the list endpoint's query and response keys
//! (`page`, `pages_to_bring`, `rowsperpage`, `row_total`, ...), so these types
//! serialize straight into the JSON the server expects.

use serde::{Deserialize, Serialize};

use crate::error::PagingError;
use crate::window::{total_pages, WindowPlan};

/// Query sent to the row source for one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// First page to bring (1-based)
    pub page: u64,
    /// Consecutive pages to bring starting at `page`
    pub pages_to_bring: u64,
    /// Rows in each page
    pub rowsperpage: u64,
}

impl PageRequest {
    /// Request used before the row total is known: first page only.
    pub fn initial(rowsperpage: u64) -> Self {
        Self {
            page: 1,
            pages_to_bring: 1,
            rowsperpage,
        }
    }

    pub fn validate(&self) -> Result<(), PagingError> {
        if self.rowsperpage == 0 {
            return Err(PagingError::ZeroRowsPerPage);
        }
        if self.pages_to_bring == 0 {
            return Err(PagingError::ZeroPagesToBring);
        }
        Ok(())
    }

    /// Zero-based index of the first row this request covers.
    pub fn first_row(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.rowsperpage)
    }
}

impl From<&WindowPlan> for PageRequest {
    fn from(plan: &WindowPlan) -> Self {
        Self {
            page: plan.first_page,
            pages_to_bring: plan.page_count,
            rowsperpage: plan.rows_per_page,
        }
    }
}

impl WindowPlan {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::from(self)
    }
}

/// Paginator summary returned with every page response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Rows matching the query across all pages
    pub row_total: u64,
    pub rowsperpage: u64,
    pub pages_to_bring: u64,
    /// Page actually served (requests past the end are pulled back)
    pub pagenumber: u64,
    pub total_pages: u64,
    pub page_before: Option<u64>,
    pub page_after: Option<u64>,
    /// 1-based index of the first row on `pagenumber`
    pub start_register: u64,
    /// 1-based index of the last row on `pagenumber`
    pub end_register: u64,
}

impl PageMeta {
    pub fn compute(row_total: u64, rowsperpage: u64, pagenumber: u64, pages_to_bring: u64) -> Self {
        let rowsperpage = rowsperpage.max(1);
        let total_pages = total_pages(row_total, rowsperpage);
        let pagenumber = pagenumber.clamp(1, total_pages);

        let page_before = (pagenumber > 1).then(|| pagenumber - 1);
        let page_after = (pagenumber < total_pages).then(|| pagenumber + 1);
        let start_register = (pagenumber - 1) * rowsperpage + 1;
        let end_register = (start_register + rowsperpage - 1).min(row_total);

        Self {
            row_total,
            rowsperpage,
            pages_to_bring,
            pagenumber,
            total_pages,
            page_before,
            page_after,
            start_register,
            end_register,
        }
    }
}

/// One response from the row source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<R> {
    pub meta: PageMeta,
    pub rows: Vec<R>,
}
