//! Glue between scroll events, the window calculator and a row source.
//!
//! [`ListView`] is what a list renderer holds: it takes scroll and resize
//! events, decides (debounced) when a new window has to be fetched, and keeps
//! the rows and spacer heights of the last applied fetch. It never performs
//! I/O itself; fetches go out as [`FetchOrder`]s and come back through
//! [`ListView::complete`], which drops results that were superseded while in
//! flight.

use std::time::Instant;
use tracing::{debug, info};

use crate::calculator::{FetchTicket, WindowCalculator, WindowDecision};
use crate::coalesce::ScrollCoalescer;
use crate::config::VtableConfig;
use crate::error::ViewportError;
use crate::pagination::{PageRequest, PageResponse};
use crate::traits::PageSource;
use crate::window::{rows_per_page, ViewportState, WindowPlan};

/// A fetch the caller must run against its row source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOrder {
    /// `None` for the metadata-only first load
    pub ticket: Option<FetchTicket>,
    pub request: PageRequest,
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Rows were applied. A changed row total may require another fetch.
    Applied { follow_up: Option<FetchOrder> },
    /// The window moved while the fetch was in flight; nothing was applied.
    Stale,
}

/// Rows currently on screen plus the spacers around them.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedWindow<R> {
    pub plan: WindowPlan,
    /// Zero-based index of `rows[0]` in the full list
    pub first_row: u64,
    pub rows: Vec<R>,
}

impl<R> RenderedWindow<R> {
    /// Rows of this window whose index falls in `range`, with their indices.
    pub fn rows_in(&self, range: std::ops::Range<u64>) -> impl Iterator<Item = (u64, &R)> {
        let first_row = self.first_row;
        self.rows
            .iter()
            .enumerate()
            .map(move |(offset, row)| (first_row + offset as u64, row))
            .filter(move |(index, _)| range.contains(index))
    }
}

pub struct ListView<R> {
    calculator: WindowCalculator,
    coalescer: ScrollCoalescer,
    multiplier: u32,
    row_height_px: f64,
    viewport_height_px: f64,
    scroll_px: f64,
    total_rows: u64,
    rendered: Option<RenderedWindow<R>>,
}

impl<R> ListView<R> {
    pub fn new(config: &VtableConfig, row_height_px: f64, viewport_height_px: f64) -> Self {
        Self {
            calculator: WindowCalculator::new(config),
            coalescer: ScrollCoalescer::new(config.debounce()),
            multiplier: config.rows_per_page_multiplier,
            row_height_px,
            viewport_height_px,
            scroll_px: 0.0,
            total_rows: 0,
            rendered: None,
        }
    }

    fn snapshot(&self) -> ViewportState {
        self.calculator.state(
            self.total_rows,
            self.row_height_px,
            self.viewport_height_px,
            self.scroll_px,
        )
    }

    /// First fetch on mount. Without a known row total only the first page is
    /// requested; its metadata then drives the real window. The memo is
    /// bypassed, so a remounted list is always fetched again.
    pub fn mount(&mut self) -> Result<FetchOrder, ViewportError> {
        if let Some(order) = self.refresh()? {
            return Ok(order);
        }
        let request = PageRequest::initial(rows_per_page(
            self.viewport_height_px,
            self.row_height_px,
            self.multiplier,
        ));
        info!(rowsperpage = request.rowsperpage, "mounting list view");
        Ok(FetchOrder { ticket: None, request })
    }

    /// Records a scroll event; the window is recomputed by [`Self::poll`]
    /// once scrolling has settled.
    pub fn scrolled(&mut self, scroll_px: f64, now: Instant) -> u64 {
        self.scroll_px = scroll_px;
        self.coalescer.note(self.snapshot(), now)
    }

    /// Applies a viewport resize right away.
    pub fn resized(&mut self, viewport_height_px: f64) -> Result<Option<FetchOrder>, ViewportError> {
        self.viewport_height_px = viewport_height_px;
        self.coalescer.flush();
        self.recompute()
    }

    /// Recomputes the window if the debounce period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Result<Option<FetchOrder>, ViewportError> {
        match self.coalescer.poll(now) {
            Some(state) => self.decide(&state),
            None => Ok(None),
        }
    }

    /// When [`Self::poll`] should next be called, if a recompute is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.coalescer.deadline()
    }

    fn recompute(&mut self) -> Result<Option<FetchOrder>, ViewportError> {
        let state = self.snapshot();
        self.decide(&state)
    }

    /// Recomputes without trusting the memo, so the window is always fetched.
    fn refresh(&mut self) -> Result<Option<FetchOrder>, ViewportError> {
        let state = self.snapshot();
        let decision = self.calculator.refresh(&state)?;
        self.apply_decision(&state, decision)
    }

    fn decide(&mut self, state: &ViewportState) -> Result<Option<FetchOrder>, ViewportError> {
        let decision = self.calculator.compute(state)?;
        self.apply_decision(state, decision)
    }

    fn apply_decision(
        &mut self,
        state: &ViewportState,
        decision: WindowDecision,
    ) -> Result<Option<FetchOrder>, ViewportError> {
        match decision {
            WindowDecision::Refresh { plan, ticket } => Ok(Some(FetchOrder {
                ticket: Some(ticket),
                request: plan.to_request(),
            })),
            WindowDecision::Unchanged(_) => Ok(None),
            WindowDecision::Empty(plan) => {
                if state.total_rows == 0 && !state.is_degenerate() {
                    self.rendered = Some(RenderedWindow {
                        plan,
                        first_row: 0,
                        rows: Vec::new(),
                    });
                }
                Ok(None)
            }
        }
    }

    /// Applies a finished fetch unless it was superseded in flight.
    pub fn complete(
        &mut self,
        ticket: Option<FetchTicket>,
        response: PageResponse<R>,
    ) -> Result<Completion, ViewportError> {
        let Some(ticket) = ticket else {
            self.total_rows = response.meta.row_total;
            debug!(row_total = self.total_rows, "initial page loaded");
            return Ok(Completion::Applied {
                follow_up: self.refresh()?,
            });
        };

        // A superseded response must not leak its row total into the view
        if !self.calculator.is_current(&ticket) {
            return Ok(Completion::Stale);
        }

        let Some(plan) = self.calculator.last_plan().copied() else {
            return Ok(Completion::Stale);
        };
        let total_changed = response.meta.row_total != self.total_rows;
        self.total_rows = response.meta.row_total;
        let plan = plan.with_total_rows(self.total_rows, self.row_height_px);
        self.rendered = Some(RenderedWindow {
            plan,
            first_row: plan.first_row(),
            rows: response.rows,
        });

        let follow_up = if total_changed { self.recompute()? } else { None };
        Ok(Completion::Applied { follow_up })
    }

    /// Forgets the memoized window and rendered rows.
    pub fn teardown(&mut self) {
        self.calculator.reset();
        self.coalescer.flush();
        self.rendered = None;
        self.total_rows = 0;
        self.scroll_px = 0.0;
    }

    pub fn rendered(&self) -> Option<&RenderedWindow<R>> {
        self.rendered.as_ref()
    }

    pub fn top_padding_px(&self) -> f64 {
        self.rendered.as_ref().map_or(0.0, |w| w.plan.top_padding_px)
    }

    pub fn bottom_padding_px(&self) -> f64 {
        self.rendered.as_ref().map_or(0.0, |w| w.plan.bottom_padding_px)
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn row_height_px(&self) -> f64 {
        self.row_height_px
    }

    pub fn viewport_height_px(&self) -> f64 {
        self.viewport_height_px
    }

    pub fn scroll_px(&self) -> f64 {
        self.scroll_px
    }

    pub fn generation(&self) -> u64 {
        self.calculator.generation()
    }

    /// Full scroll height the spacers and rows add up to.
    pub fn scroll_height_px(&self) -> f64 {
        WindowPlan::scroll_height_px(self.total_rows, self.row_height_px)
    }
}

/// Runs `order` against `source` and feeds the result back, following up
/// until the view is settled. Meant for synchronous sources.
pub fn fetch_blocking<S>(view: &mut ListView<S::Row>, source: &S, order: FetchOrder) -> anyhow::Result<Completion>
where
    S: PageSource,
{
    let mut order = order;
    loop {
        let response = source.fetch(&order.request)?;
        let completion = view.complete(order.ticket, response)?;
        match completion {
            Completion::Applied { follow_up: Some(next) } => order = next,
            other => return Ok(other),
        }
    }
}
