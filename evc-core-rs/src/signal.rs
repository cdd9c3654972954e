//! Signal source contract
//!
//! The supervisor depends only on this capability set. Each hardware protocol
//! (Modbus register mapper, simulated charge point, ...) provides its own
//! implementation.
//!
//! # Implementing a signal source
//!
//! ```ignore
//! struct ModbusChargePoint { /* register map, connection */ }
//!
//! impl SignalSource for ModbusChargePoint {
//!     fn is_vehicle_connected(&self) -> bool {
//!         // Read the vehicle status register
//!     }
//!
//!     // ... implement other methods
//! }
//! ```

use crate::error::ConfigurationError;

/// Capability set of a charge point driver
///
/// Queries must be side-effect free and return promptly. Implementations are
/// shared between the supervisor and its poller, so all methods take `&self`.
pub trait SignalSource: Send + Sync {
    fn is_vehicle_connected(&self) -> bool;

    fn is_vehicle_not_connected(&self) -> bool;

    fn is_charging(&self) -> bool;

    fn is_charging_completed(&self) -> bool;

    fn is_in_error_state(&self) -> bool;

    /// Seconds between vehicle presence polls
    fn vehicle_status_poll_interval(&self) -> u64;

    /// Command the hardware to start charging
    fn start_charging(&self);

    /// Check driver configuration, once at initialization
    fn validate(&self) -> Result<(), ConfigurationError>;

    /// Associate the driver with an appliance, for its own logging
    fn set_appliance_id(&self, _appliance_id: &str) {}
}

/// One sample of every predicate the evaluator consults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub vehicle_connected: bool,
    pub vehicle_not_connected: bool,
    pub charging: bool,
    pub charging_completed: bool,
    pub in_error_state: bool,
}

impl Signals {
    /// Query all predicates from a signal source
    pub fn sample<S: SignalSource + ?Sized>(source: &S) -> Self {
        Self {
            vehicle_connected: source.is_vehicle_connected(),
            vehicle_not_connected: source.is_vehicle_not_connected(),
            charging: source.is_charging(),
            charging_completed: source.is_charging_completed(),
            in_error_state: source.is_in_error_state(),
        }
    }

    /// No vehicle plugged in
    pub fn idle() -> Self {
        Self {
            vehicle_not_connected: true,
            ..Default::default()
        }
    }

    /// Vehicle plugged in, not charging
    pub fn connected() -> Self {
        Self {
            vehicle_connected: true,
            ..Default::default()
        }
    }

    /// Vehicle plugged in and drawing current
    pub fn charging() -> Self {
        Self {
            vehicle_connected: true,
            charging: true,
            ..Default::default()
        }
    }

    /// Vehicle plugged in, charge finished
    pub fn completed() -> Self {
        Self {
            vehicle_connected: true,
            charging_completed: true,
            ..Default::default()
        }
    }

    /// Same sample with the fault signal set
    pub fn with_error(mut self, in_error_state: bool) -> Self {
        self.in_error_state = in_error_state;
        self
    }
}
