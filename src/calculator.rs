//! Memoized window calculator for one list view.
//!
//! Wraps [`plan_window`] with the last computed window so that repeated
//! scroll/resize events that land on the same pages never trigger a refetch.
//! Every time the window moves the generation counter is bumped; fetches
//! carry the generation they were issued under in a [`FetchTicket`], and the
//! calculator tells stale completions apart from current ones.

use tracing::{debug, trace, warn};

use crate::config::VtableConfig;
use crate::error::ViewportError;
use crate::window::{plan_window, ViewportState, WindowKey, WindowPlan};

/// Identifies an issued fetch so its completion can be checked for staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub key: WindowKey,
}

/// Outcome of feeding one viewport snapshot to the calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowDecision {
    /// Nothing to fetch: the list is empty or the viewport is degenerate.
    Empty(WindowPlan),
    /// Same window as last time; the previous plan is returned as is.
    Unchanged(WindowPlan),
    /// The window moved; fetch `plan` and check `ticket` when it completes.
    Refresh { plan: WindowPlan, ticket: FetchTicket },
}

impl WindowDecision {
    pub fn plan(&self) -> &WindowPlan {
        match self {
            WindowDecision::Empty(plan) | WindowDecision::Unchanged(plan) => plan,
            WindowDecision::Refresh { plan, .. } => plan,
        }
    }

    pub fn needs_fetch(&self) -> bool {
        matches!(self, WindowDecision::Refresh { .. })
    }
}

/// Window calculator with the last computed window memoized.
#[derive(Debug, Clone)]
pub struct WindowCalculator {
    multiplier: u32,
    cache_radius_pages: u32,
    last: Option<WindowPlan>,
    generation: u64,
}

impl Default for WindowCalculator {
    fn default() -> Self {
        Self::new(&VtableConfig::default())
    }
}

impl WindowCalculator {
    pub fn new(config: &VtableConfig) -> Self {
        Self {
            multiplier: config.rows_per_page_multiplier,
            cache_radius_pages: config.cache_radius_pages,
            last: None,
            generation: 0,
        }
    }

    /// Builds a snapshot using this calculator's cache radius.
    pub fn state(
        &self,
        total_rows: u64,
        row_height_px: f64,
        viewport_height_px: f64,
        scroll_px: f64,
    ) -> ViewportState {
        ViewportState::new(
            total_rows,
            row_height_px,
            viewport_height_px,
            scroll_px,
            self.cache_radius_pages,
        )
    }

    /// Plans the window for `state`, returning the previous plan untouched
    /// when the (first page, page count, rows per page) triple is unchanged.
    pub fn compute(&mut self, state: &ViewportState) -> Result<WindowDecision, ViewportError> {
        let plan = plan_window(state, self.multiplier).inspect_err(|err| {
            warn!(%err, "rejected viewport state");
        })?;

        if state.total_rows == 0 || state.is_degenerate() {
            trace!(total_rows = state.total_rows, "empty window");
            return Ok(WindowDecision::Empty(plan));
        }

        if let Some(last) = self.last {
            if last.key() == plan.key() {
                trace!(first_page = last.first_page, "window unchanged");
                return Ok(WindowDecision::Unchanged(last));
            }
        }

        self.generation += 1;
        self.last = Some(plan);
        debug!(
            generation = self.generation,
            first_page = plan.first_page,
            page_count = plan.page_count,
            rows_per_page = plan.rows_per_page,
            "window refresh"
        );

        Ok(WindowDecision::Refresh {
            plan,
            ticket: FetchTicket {
                generation: self.generation,
                key: plan.key(),
            },
        })
    }

    /// Like [`Self::compute`], but never answers `Unchanged`.
    ///
    /// Used when the rows on screen cannot be trusted to match the memo, such
    /// as on mount after the list was emptied.
    pub fn refresh(&mut self, state: &ViewportState) -> Result<WindowDecision, ViewportError> {
        let forgotten = self.last.take();
        let decision = self.compute(state);
        if !matches!(decision, Ok(WindowDecision::Refresh { .. })) {
            self.last = forgotten;
        }
        decision
    }

    /// The memoized window, if any fetch has been planned since the last reset.
    pub fn last_window(&self) -> Option<WindowKey> {
        self.last.map(|plan| plan.key())
    }

    /// The memoized plan itself.
    pub fn last_plan(&self) -> Option<&WindowPlan> {
        self.last.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True if a fetch issued under `ticket` may still be applied.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        let current = ticket.generation == self.generation
            && self.last_window() == Some(ticket.key);
        if !current {
            warn!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                "discarding stale fetch"
            );
        }
        current
    }

    /// Forgets the memoized window (list view torn down).
    ///
    /// The generation keeps counting so tickets from before the reset stay stale.
    pub fn reset(&mut self) {
        self.last = None;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> WindowCalculator {
        WindowCalculator::new(&VtableConfig::default())
    }

    fn snapshot(total: u64, row_height: f64, viewport: f64, scroll: f64) -> ViewportState {
        ViewportState::new(total, row_height, viewport, scroll, 4)
    }

    #[test]
    fn test_first_compute_refreshes() {
        let mut calc = calculator();
        let state = calc.state(1000, 40.0, 800.0, 8000.0);
        let decision = calc.compute(&state).unwrap();

        assert!(decision.needs_fetch());
        assert_eq!(decision.plan().first_page, 10);
        assert_eq!(calc.generation(), 1);
        assert_eq!(
            calc.last_window(),
            Some(WindowKey { first_page: 10, page_count: 4, rows_per_page: 20 })
        );
    }

    #[test]
    fn test_same_state_is_unchanged() {
        let mut calc = calculator();
        let state = calc.state(1000, 40.0, 800.0, 8000.0);
        let first = calc.compute(&state).unwrap();
        let last_window = calc.last_window();

        let second = calc.compute(&state).unwrap();
        assert_eq!(second, WindowDecision::Unchanged(*first.plan()));
        assert_eq!(calc.last_window(), last_window);
        assert_eq!(calc.generation(), 1);
    }

    #[test]
    fn test_small_scroll_within_page_is_unchanged() {
        let mut calc = calculator();
        calc.compute(&snapshot(1000, 40.0, 800.0, 8000.0)).unwrap();
        let decision = calc.compute(&snapshot(1000, 40.0, 800.0, 8100.0)).unwrap();
        assert!(matches!(decision, WindowDecision::Unchanged(_)));
    }

    #[test]
    fn test_resize_changes_page_size_and_refreshes() {
        let mut calc = calculator();
        calc.compute(&snapshot(1000, 40.0, 800.0, 0.0)).unwrap();
        let decision = calc.compute(&snapshot(1000, 40.0, 1200.0, 0.0)).unwrap();
        assert!(decision.needs_fetch());
        assert_eq!(decision.plan().rows_per_page, 30);
    }

    #[test]
    fn test_empty_list_does_not_touch_memo() {
        let mut calc = calculator();
        let decision = calc.compute(&snapshot(0, 40.0, 800.0, 0.0)).unwrap();
        assert!(matches!(decision, WindowDecision::Empty(_)));
        assert_eq!(calc.last_window(), None);
        assert_eq!(calc.generation(), 0);
    }

    #[test]
    fn test_stale_ticket_rejected() {
        let mut calc = calculator();
        let WindowDecision::Refresh { ticket: old, .. } =
            calc.compute(&snapshot(1000, 40.0, 800.0, 0.0)).unwrap()
        else {
            panic!("expected refresh");
        };
        assert!(calc.is_current(&old));

        let WindowDecision::Refresh { ticket: new, .. } =
            calc.compute(&snapshot(1000, 40.0, 800.0, 20_000.0)).unwrap()
        else {
            panic!("expected refresh");
        };
        assert!(!calc.is_current(&old));
        assert!(calc.is_current(&new));
    }

    #[test]
    fn test_reset_clears_memo_and_invalidates_tickets() {
        let mut calc = calculator();
        let state = calc.state(1000, 40.0, 800.0, 0.0);
        let WindowDecision::Refresh { ticket, .. } = calc.compute(&state).unwrap() else {
            panic!("expected refresh");
        };

        calc.reset();
        assert_eq!(calc.last_window(), None);
        assert!(!calc.is_current(&ticket));
        assert!(calc.compute(&state).unwrap().needs_fetch());
    }

    #[test]
    fn test_refresh_bypasses_memo() {
        let mut calc = calculator();
        let state = calc.state(1000, 40.0, 800.0, 0.0);
        calc.compute(&state).unwrap();
        assert!(!calc.compute(&state).unwrap().needs_fetch());

        let decision = calc.refresh(&state).unwrap();
        assert!(decision.needs_fetch());
        assert_eq!(calc.generation(), 2);
        assert_eq!(calc.last_window(), Some(decision.plan().key()));
    }

    #[test]
    fn test_refresh_of_empty_list_keeps_memo() {
        let mut calc = calculator();
        calc.compute(&snapshot(1000, 40.0, 800.0, 0.0)).unwrap();
        let before = calc.last_window();

        let decision = calc.refresh(&snapshot(0, 40.0, 800.0, 0.0)).unwrap();
        assert!(matches!(decision, WindowDecision::Empty(_)));
        assert_eq!(calc.last_window(), before);
    }

    #[test]
    fn test_invalid_state_leaves_memo_alone() {
        let mut calc = calculator();
        calc.compute(&snapshot(1000, 40.0, 800.0, 0.0)).unwrap();
        let before = calc.last_window();

        assert!(calc.compute(&snapshot(1000, 40.0, 800.0, f64::NAN)).is_err());
        assert_eq!(calc.last_window(), before);
    }
}
