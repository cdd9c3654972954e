//! Visit bookkeeping for orchestration layers
//!
//! Counts how many times each state has been entered. A state counts as
//! entered when it differs from the previous one; staying in a state is not a
//! new visit. Counts are never reset during a supervisor's lifetime.

use crate::types::State;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitTracker {
    entries: [u32; State::COUNT],
}

impl VisitTracker {
    /// Tracker that has already entered `initial`
    pub fn starting_in(initial: State) -> Self {
        let mut tracker = Self::default();
        tracker.record_entry(initial);
        tracker
    }

    /// Record one entry into `state`
    pub fn record_entry(&mut self, state: State) {
        let count = &mut self.entries[state.index()];
        *count = count.saturating_add(1);
    }

    /// Number of times `state` has been entered
    pub fn visit_count(&self, state: State) -> u32 {
        self.entries[state.index()]
    }

    /// `state` has been entered at least once
    pub fn was_in_state(&self, state: State) -> bool {
        self.visit_count(state) > 0
    }

    /// `state` has been entered exactly once
    ///
    /// Stays true after leaving the state, and turns false for good on the
    /// second entry.
    pub fn was_in_state_one_time(&self, state: State) -> bool {
        self.visit_count(state) == 1
    }
}
