//! Simulated charge point
//!
//! In-memory [`SignalSource`] whose signals are set by hand. Used by the
//! test suite and by `evc-node` to play scripted charging sessions.

use parking_lot::Mutex;
use tracing::debug;

use crate::error::ConfigurationError;
use crate::signal::{SignalSource, Signals};
use crate::types::ApplianceId;

#[derive(Debug, Default)]
struct SimState {
    signals: Signals,
    start_commands: u32,
    appliance_id: Option<ApplianceId>,
}

/// Charge point driven by explicit signal changes
#[derive(Debug)]
pub struct SimulatedChargePoint {
    poll_interval_secs: u64,
    state: Mutex<SimState>,
}

impl SimulatedChargePoint {
    /// Idle charge point (no vehicle) polled every `poll_interval_secs`
    pub fn new(poll_interval_secs: u64) -> Self {
        Self {
            poll_interval_secs,
            state: Mutex::new(SimState {
                signals: Signals::idle(),
                ..Default::default()
            }),
        }
    }

    /// Replace every signal at once
    pub fn set_signals(&self, signals: Signals) {
        self.state.lock().signals = signals;
    }

    /// Current signals
    pub fn signals(&self) -> Signals {
        self.state.lock().signals
    }

    /// Vehicle plugged in, not charging
    pub fn plug_in(&self) {
        self.set_signals(Signals::connected());
    }

    /// Vehicle unplugged; clears charging and completion
    pub fn unplug(&self) {
        self.set_signals(Signals::idle());
    }

    /// Hardware reports charging (or stops reporting it)
    pub fn set_charging(&self, charging: bool) {
        let mut state = self.state.lock();
        state.signals.charging = charging;
        if charging {
            state.signals.charging_completed = false;
        }
    }

    /// Hardware reports the vehicle's charge as finished
    pub fn complete_charging(&self) {
        let mut state = self.state.lock();
        state.signals.charging = false;
        state.signals.charging_completed = true;
    }

    /// Raise or clear the hardware fault
    pub fn set_fault(&self, in_error_state: bool) {
        self.state.lock().signals.in_error_state = in_error_state;
    }

    /// Number of start commands received
    pub fn start_charging_count(&self) -> u32 {
        self.state.lock().start_commands
    }

    /// Appliance id propagated by the supervisor
    pub fn appliance_id(&self) -> Option<ApplianceId> {
        self.state.lock().appliance_id.clone()
    }
}

impl SignalSource for SimulatedChargePoint {
    fn is_vehicle_connected(&self) -> bool {
        self.state.lock().signals.vehicle_connected
    }

    fn is_vehicle_not_connected(&self) -> bool {
        self.state.lock().signals.vehicle_not_connected
    }

    fn is_charging(&self) -> bool {
        self.state.lock().signals.charging
    }

    fn is_charging_completed(&self) -> bool {
        self.state.lock().signals.charging_completed
    }

    fn is_in_error_state(&self) -> bool {
        self.state.lock().signals.in_error_state
    }

    fn vehicle_status_poll_interval(&self) -> u64 {
        self.poll_interval_secs
    }

    fn start_charging(&self) {
        let mut state = self.state.lock();
        state.start_commands += 1;
        debug!(
            "{}: Simulated start charging command #{}",
            state.appliance_id.as_deref().unwrap_or("-"),
            state.start_commands
        );
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigurationError::ZeroPollInterval);
        }
        Ok(())
    }

    fn set_appliance_id(&self, appliance_id: &str) {
        self.state.lock().appliance_id = Some(appliance_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_signals() {
        let cp = SimulatedChargePoint::new(10);
        assert!(cp.is_vehicle_not_connected());
        assert!(!cp.is_vehicle_connected());

        cp.plug_in();
        cp.set_charging(true);
        assert!(cp.is_vehicle_connected() && cp.is_charging());

        cp.complete_charging();
        assert!(!cp.is_charging());
        assert!(cp.is_charging_completed());

        cp.unplug();
        assert_eq!(cp.signals(), Signals::idle());
    }

    #[test]
    fn test_fault_is_independent_of_session() {
        let cp = SimulatedChargePoint::new(10);
        cp.plug_in();
        cp.set_fault(true);
        assert!(cp.is_in_error_state());
        assert!(cp.is_vehicle_connected());
    }

    #[test]
    fn test_validate() {
        assert!(SimulatedChargePoint::new(10).validate().is_ok());
        assert_eq!(
            SimulatedChargePoint::new(0).validate(),
            Err(ConfigurationError::ZeroPollInterval)
        );
    }

    #[test]
    fn test_counts_start_commands() {
        let cp = SimulatedChargePoint::new(10);
        cp.start_charging();
        cp.start_charging();
        assert_eq!(cp.start_charging_count(), 2);
    }
}
