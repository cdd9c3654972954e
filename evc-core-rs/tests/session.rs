//! Charging session scenarios
//!
//! Drives a supervisor over a simulated charge point through complete
//! sessions. Every step evaluates twice, as a host loop may tick more than
//! once per signal change.

use std::sync::Arc;

use evc_core::{
    ChargerConfig, ChargerSupervisor, Clock, ManualClock, SimulatedChargePoint, State,
};

struct Session {
    source: Arc<SimulatedChargePoint>,
    clock: ManualClock,
    supervisor: ChargerSupervisor<SimulatedChargePoint, ManualClock>,
}

impl Session {
    fn new() -> Self {
        let source = Arc::new(SimulatedChargePoint::new(10));
        let clock = ManualClock::new(1_000_000);
        let config = ChargerConfig::new("TEST");
        let supervisor = ChargerSupervisor::new(source.clone(), config, clock.clone());
        Self {
            source,
            clock,
            supervisor,
        }
    }

    /// Set signals (not connected, connected, charging, completed) and tick twice
    fn step(&mut self, not_connected: bool, connected: bool, charging: bool, completed: bool) -> State {
        let mut signals = self.source.signals();
        signals.vehicle_not_connected = not_connected;
        signals.vehicle_connected = connected;
        signals.charging = charging;
        signals.charging_completed = completed;
        self.source.set_signals(signals);

        let now = self.clock.now_millis();
        self.supervisor.update_state(now);
        self.supervisor.update_state(now);
        self.supervisor.state()
    }

    fn run_uninterrupted(&mut self) {
        assert_eq!(self.step(true, false, false, false), State::VehicleNotConnected);
        assert_eq!(self.step(false, true, false, false), State::VehicleConnected);
        assert_eq!(self.step(false, true, true, false), State::Charging);
        assert_eq!(self.step(false, true, false, true), State::ChargingCompleted);
        assert_eq!(self.step(true, false, false, true), State::VehicleNotConnected);
    }
}

#[test]
fn test_session_no_interruption() {
    let mut session = Session::new();
    session.run_uninterrupted();
}

#[test]
fn test_session_no_interruption_two_cycles() {
    let mut session = Session::new();
    session.run_uninterrupted();
    session.run_uninterrupted();

    let supervisor = &session.supervisor;
    assert_eq!(supervisor.visit_count(State::Charging), 2);
    assert!(supervisor.was_in_state(State::ChargingCompleted));
    assert!(!supervisor.was_in_state_one_time(State::ChargingCompleted));
}

#[test]
fn test_session_with_abandoned_start_attempt() {
    let mut session = Session::new();
    session.supervisor = ChargerSupervisor::new(
        session.source.clone(),
        ChargerConfig::new("TEST").with_start_charging_state_detection_delay(2),
        session.clock.clone(),
    );

    assert_eq!(session.step(true, false, false, false), State::VehicleNotConnected);
    assert_eq!(session.step(false, true, false, false), State::VehicleConnected);
    assert_eq!(session.step(false, true, true, false), State::Charging);
    assert_eq!(session.step(false, true, false, false), State::VehicleConnected);

    session.supervisor.start_charging();
    while !session.supervisor.update_state(session.clock.now_millis()) {
        assert!(session.supervisor.is_on(session.clock.now_millis()));
        session.clock.advance(500);
    }
    assert_eq!(session.step(false, true, false, false), State::VehicleConnected);
    assert!(!session.supervisor.is_on(session.clock.now_millis()));

    assert_eq!(session.step(false, true, true, false), State::Charging);
    assert_eq!(session.step(false, true, false, true), State::ChargingCompleted);
    assert_eq!(session.step(true, false, false, true), State::VehicleNotConnected);
}

#[test]
fn test_session_initially_connected() {
    let mut session = Session::new();
    assert_eq!(session.step(false, true, false, false), State::VehicleConnected);
    assert_eq!(session.step(false, true, true, false), State::Charging);
    assert_eq!(session.step(false, true, false, true), State::ChargingCompleted);
    assert_eq!(session.step(true, false, false, true), State::VehicleNotConnected);
}

#[test]
fn test_session_unplugged_while_charging() {
    let mut session = Session::new();
    assert_eq!(session.step(true, false, false, false), State::VehicleNotConnected);
    assert_eq!(session.step(false, true, false, false), State::VehicleConnected);
    assert_eq!(session.step(false, true, true, false), State::Charging);
    assert_eq!(session.step(true, false, false, true), State::VehicleNotConnected);
}

#[test]
fn test_session_fault_while_charging() {
    let mut session = Session::new();
    assert_eq!(session.step(false, true, true, false), State::Charging);

    session.source.set_fault(true);
    assert_eq!(session.step(false, true, true, false), State::Error);
    assert!(!session.supervisor.is_on(session.clock.now_millis()));

    session.source.set_fault(false);
    assert_eq!(session.step(false, true, true, false), State::Charging);
    assert!(session.supervisor.is_on(session.clock.now_millis()));
}

#[test]
fn test_session_confirmed_start_keeps_output_on() {
    let mut session = Session::new();
    assert_eq!(session.step(false, true, false, false), State::VehicleConnected);

    session.supervisor.start_charging();
    let mut outputs = Vec::new();
    for tick in 0..6 {
        if tick == 3 {
            session.source.set_charging(true);
        }
        session.supervisor.update_state(session.clock.now_millis());
        outputs.push(session.supervisor.is_on(session.clock.now_millis()));
        session.clock.advance(10_000);
    }

    assert!(outputs.iter().all(|on| *on));
    assert_eq!(session.supervisor.state(), State::Charging);
    assert_eq!(session.supervisor.charging_attempt_started_at(), None);
}
