//! State evaluation
//!
//! Pure mapping from the current state and one sample of hardware signals to
//! the next state. Rule order (first match wins):
//!
//! 1. Fault signal set -> `Error`, remembering the preempted state
//! 2. In `Error` with the fault cleared -> resume the preempted state, then
//!    keep evaluating from there
//! 3. Vehicle not connected -> `VehicleNotConnected`
//! 4. Vehicle present (already in a connected state, or newly reported
//!    connected) -> `ChargingCompleted`, `Charging` or `VehicleConnected`
//! 5. Otherwise unchanged

use crate::signal::Signals;
use crate::types::State;

/// Current state plus the state an active fault preempted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateSlot {
    pub current: State,
    /// Only set while `current` is `Error`
    pub preempted: Option<State>,
}

impl StateSlot {
    pub fn new(current: State) -> Self {
        Self {
            current,
            preempted: None,
        }
    }

    /// Force a state, remembering `self.current` if the new state is `Error`
    pub fn forced(self, state: State) -> Self {
        if state == State::Error {
            Self::faulted(self)
        } else {
            Self::new(state)
        }
    }

    fn faulted(from: StateSlot) -> Self {
        // A fault reported while already faulted keeps the original slot
        let preempted = match from.current {
            State::Error => from.preempted,
            other => Some(other),
        };
        Self {
            current: State::Error,
            preempted,
        }
    }
}

/// Compute the next state for one evaluation tick
///
/// Idempotent: `next_state(next_state(s, x), x) == next_state(s, x)`.
pub fn next_state(slot: StateSlot, signals: &Signals) -> StateSlot {
    if signals.in_error_state {
        return StateSlot::faulted(slot);
    }

    let resumed = match slot.current {
        State::Error => slot
            .preempted
            .filter(|state| *state != State::Error)
            .unwrap_or_default(),
        other => other,
    };

    StateSlot::new(diagnose(resumed, signals))
}

fn diagnose(current: State, signals: &Signals) -> State {
    if signals.vehicle_not_connected {
        return State::VehicleNotConnected;
    }

    if current.is_vehicle_present() || signals.vehicle_connected {
        return if signals.charging_completed {
            State::ChargingCompleted
        } else if signals.charging {
            State::Charging
        } else {
            State::VehicleConnected
        };
    }

    current
}
