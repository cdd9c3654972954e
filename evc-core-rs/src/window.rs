//! Start-charging confirmation window
//!
//! After a start command the hardware may take a while before it reports
//! charging. During that window the control output stays on so the contactor
//! is not toggled while confirmation is pending.

use crate::types::{State, TimestampMs};

/// True while `now` is less than `delay_secs` after `attempt_start`
///
/// A `now` earlier than `attempt_start` comes from a different time base and
/// never counts as inside the window.
pub fn is_within_confirmation_window(
    delay_secs: u32,
    now: TimestampMs,
    attempt_start: Option<TimestampMs>,
) -> bool {
    match attempt_start {
        Some(started) => {
            let elapsed = now.saturating_sub(started);
            (0..i64::from(delay_secs) * 1000).contains(&elapsed)
        }
        None => false,
    }
}

/// Control output: energize the load
pub fn is_on(
    state: State,
    delay_secs: u32,
    now: TimestampMs,
    attempt_start: Option<TimestampMs>,
) -> bool {
    state == State::Charging || is_within_confirmation_window(delay_secs, now, attempt_start)
}

/// Open charging attempt awaiting hardware confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationWindow {
    delay_secs: u32,
    started_at: Option<TimestampMs>,
}

impl ConfirmationWindow {
    pub fn new(delay_secs: u32) -> Self {
        Self {
            delay_secs,
            started_at: None,
        }
    }

    pub fn delay_secs(&self) -> u32 {
        self.delay_secs
    }

    /// When the pending attempt was started, if any
    pub fn started_at(&self) -> Option<TimestampMs> {
        self.started_at
    }

    /// Start (or restart) an attempt at `now`
    pub fn open(&mut self, now: TimestampMs) {
        self.started_at = Some(now);
    }

    /// Forget the pending attempt
    pub fn clear(&mut self) {
        self.started_at = None;
    }

    /// An attempt is pending, confirmed or not
    pub fn is_pending(&self) -> bool {
        self.started_at.is_some()
    }

    /// An attempt is pending and has not yet expired at `now`
    pub fn is_open(&self, now: TimestampMs) -> bool {
        is_within_confirmation_window(self.delay_secs, now, self.started_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: u32 = 300;
    const NOW: TimestampMs = 1_000_000;

    #[test]
    fn test_window_truth_table() {
        assert!(!is_within_confirmation_window(DELAY, NOW, None));
        assert!(is_within_confirmation_window(DELAY, NOW, Some(NOW - 299 * 1000)));
        assert!(!is_within_confirmation_window(DELAY, NOW, Some(NOW - 301 * 1000)));
    }

    #[test]
    fn test_window_upper_bound_is_exclusive() {
        assert!(is_within_confirmation_window(DELAY, NOW, Some(NOW - 300 * 1000 + 1)));
        assert!(!is_within_confirmation_window(DELAY, NOW, Some(NOW - 300 * 1000)));
    }

    #[test]
    fn test_now_before_attempt_start_is_expired() {
        assert!(!is_within_confirmation_window(DELAY, 0, Some(NOW)));
        assert!(!is_within_confirmation_window(DELAY, NOW - 1, Some(NOW)));
        assert!(!is_on(State::VehicleConnected, DELAY, 0, Some(NOW)));
    }

    #[test]
    fn test_zero_delay_never_open() {
        assert!(!is_within_confirmation_window(0, NOW, Some(NOW)));
    }

    #[test]
    fn test_is_on_not_charging_mirrors_window() {
        let state = State::VehicleConnected;
        assert!(!is_on(state, DELAY, NOW, None));
        assert!(is_on(state, DELAY, NOW, Some(NOW - 299 * 1000)));
        assert!(!is_on(state, DELAY, NOW, Some(NOW - 301 * 1000)));
    }

    #[test]
    fn test_is_on_while_charging() {
        assert!(is_on(State::Charging, DELAY, 0, None));
        assert!(is_on(State::Charging, DELAY, NOW, Some(NOW - 299 * 1000)));
        assert!(is_on(State::Charging, DELAY, NOW, Some(NOW - 301 * 1000)));
    }

    #[test]
    fn test_confirmation_window_lifecycle() {
        let mut window = ConfirmationWindow::new(2);
        assert!(!window.is_pending());
        assert!(!window.is_open(NOW));

        window.open(NOW);
        assert!(window.is_pending());
        assert!(window.is_open(NOW + 1_999));
        assert!(!window.is_open(NOW + 2_000));

        window.clear();
        assert_eq!(window.started_at(), None);
    }
}
