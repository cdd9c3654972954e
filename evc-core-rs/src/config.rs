//! Configuration for the charger supervisor

use crate::error::ConfigurationError;
use crate::types::ApplianceId;

/// Default tolerance for the hardware to report charging after a start command
pub const DEFAULT_START_CHARGING_STATE_DETECTION_DELAY_SECS: u32 = 300;

/// Supervisor configuration
#[derive(Debug, Clone)]
pub struct ChargerConfig {
    /// Appliance this charge point belongs to
    pub appliance_id: Option<ApplianceId>,

    /// Seconds to wait for the hardware to report charging after a start command
    pub start_charging_state_detection_delay: u32,
}

impl Default for ChargerConfig {
    fn default() -> Self {
        Self {
            appliance_id: None,
            start_charging_state_detection_delay: DEFAULT_START_CHARGING_STATE_DETECTION_DELAY_SECS,
        }
    }
}

impl ChargerConfig {
    /// Create config for the given appliance
    pub fn new(appliance_id: impl Into<ApplianceId>) -> Self {
        Self {
            appliance_id: Some(appliance_id.into()),
            ..Default::default()
        }
    }

    /// Set the start charging state detection delay (seconds)
    pub fn with_start_charging_state_detection_delay(mut self, seconds: u32) -> Self {
        self.start_charging_state_detection_delay = seconds;
        self
    }

    /// Check the configuration for structural problems
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match &self.appliance_id {
            Some(id) if id.trim().is_empty() => Err(ConfigurationError::EmptyApplianceId),
            _ => Ok(()),
        }
    }
}
