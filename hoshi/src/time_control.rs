//! This module holds all the time and budget tracking for a single search.
//!
//! A search runs under up to three limits at once:
//!
//! 1. A soft deadline from the caller's time budget: once past it, no new
//!    iteration starts and the ongoing one is wound down.
//! 2. An absolute deadline (ten seconds unless overridden): a hard wall
//!    the search may never cross, whatever state it is in.
//! 3. A node budget, for reproducible searches independent of wall clock.
//!
//! Checking the clock on every node would cost more than the search
//! itself, so the controller only really looks every `CHECKUP_WINDOW`
//! nodes. Which limit fired is recorded in separate flags: the
//! iterative-deepening driver treats a soft timeout differently from a
//! hard one when deciding what to report.

use crate::search::params::{CHECKUP_WINDOW, DEFAULT_ABSOLUTE_TIME_LIMIT_MS};
use std::time::{Duration, Instant};

/// The time controller is in charge of determining when a search should
/// continue or stop in order not to violate the requested limits.
#[derive(Debug, Clone)]
pub struct TimeController {
    /// The instant the search was started
    start: Instant,

    /// Soft limit: don't exceed the caller's budget.
    deadline: Option<Instant>,

    /// Hard limit: never run past this, no matter what.
    absolute_deadline: Instant,

    /// Node budget, when searching by nodes instead of time.
    max_nodes: Option<u64>,

    /// The next node count at which to check the clocks.
    next_checkup: u64,

    /// The soft deadline fired.
    pub timeout: bool,

    /// The hard deadline fired.
    pub absolute_deadline_exceeded: bool,

    /// The node budget ran out.
    pub node_budget_exceeded: bool,
}

impl TimeController {
    pub fn new(
        time_limit: Option<Duration>,
        absolute_time_limit: Option<Duration>,
        max_nodes: Option<u64>,
    ) -> Self {
        let start = Instant::now();
        let absolute = absolute_time_limit
            .unwrap_or(Duration::from_millis(DEFAULT_ABSOLUTE_TIME_LIMIT_MS));

        Self {
            start,
            deadline: time_limit.map(|limit| start + limit),
            absolute_deadline: start + absolute,
            max_nodes,
            next_checkup: CHECKUP_WINDOW,
            timeout: false,
            absolute_deadline_exceeded: false,
            node_budget_exceeded: false,
        }
    }

    /// Check whether the search should continue. Cheap except once per
    /// checkup window; once any flag is set, always false.
    pub fn should_continue(&mut self, nodes: u64) -> bool {
        if self.interrupted() {
            return false;
        }

        // The node budget is exact, not checkup-based: it exists for
        // reproducibility.
        if let Some(max_nodes) = self.max_nodes {
            if nodes >= max_nodes {
                self.node_budget_exceeded = true;
                return false;
            }
        }

        if nodes < self.next_checkup {
            return true;
        }

        self.next_checkup = nodes + CHECKUP_WINDOW;
        let now = Instant::now();

        if now >= self.absolute_deadline {
            self.absolute_deadline_exceeded = true;
            return false;
        }

        if let Some(deadline) = self.deadline {
            if now >= deadline {
                self.timeout = true;
                return false;
            }
        }

        true
    }

    /// Check whether a new iterative-deepening iteration is worth
    /// starting.
    pub fn should_start_iteration(&self, depth: usize) -> bool {
        // Always run at least one iteration, so there is a move to return.
        if depth <= 1 {
            return true;
        }

        if self.interrupted() {
            return false;
        }

        let now = Instant::now();

        if now >= self.absolute_deadline {
            return false;
        }

        match self.deadline {
            Some(deadline) => now < deadline,
            None => true,
        }
    }

    /// Whether any limit has fired.
    pub fn interrupted(&self) -> bool {
        self.timeout || self.absolute_deadline_exceeded || self.node_budget_exceeded
    }

    /// Return the time that's elapsed since the start of the search.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_budget_is_exact() {
        let mut tc = TimeController::new(None, None, Some(100));

        assert!(tc.should_continue(99));
        assert!(!tc.should_continue(100));
        assert!(tc.node_budget_exceeded);
        assert!(!tc.timeout);
        assert!(tc.interrupted());

        // Once tripped, the controller stays tripped.
        assert!(!tc.should_continue(0));
    }

    #[test]
    fn expired_soft_deadline_stops_new_iterations() {
        let tc = TimeController::new(Some(Duration::ZERO), None, None);

        assert!(tc.should_start_iteration(1));
        assert!(!tc.should_start_iteration(2));
    }

    #[test]
    fn soft_deadline_fires_at_checkup() {
        let mut tc = TimeController::new(Some(Duration::ZERO), None, None);

        // Below the checkup window nothing is checked yet.
        assert!(tc.should_continue(1));

        assert!(!tc.should_continue(CHECKUP_WINDOW));
        assert!(tc.timeout);
    }

    #[test]
    fn unlimited_controller_never_stops() {
        let mut tc = TimeController::new(None, None, None);

        assert!(tc.should_continue(10 * CHECKUP_WINDOW));
        assert!(tc.should_start_iteration(50));
        assert!(!tc.interrupted());
    }
}
