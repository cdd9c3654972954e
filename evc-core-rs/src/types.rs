//! Core types for the charger supervisor

use serde::{Deserialize, Serialize};

/// Epoch timestamp in milliseconds
pub type TimestampMs = i64;

/// Identity of the appliance a supervisor is attached to
pub type ApplianceId = String;

/// Operating phase of a charge point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    #[default]
    VehicleNotConnected,
    VehicleConnected,
    Charging,
    ChargingCompleted,
    Error,
}

impl State {
    /// Number of states
    pub const COUNT: usize = 5;

    /// All states, in declaration order
    pub const ALL: [State; State::COUNT] = [
        State::VehicleNotConnected,
        State::VehicleConnected,
        State::Charging,
        State::ChargingCompleted,
        State::Error,
    ];

    /// Stable position of this state in [`State::ALL`]
    pub fn index(self) -> usize {
        match self {
            State::VehicleNotConnected => 0,
            State::VehicleConnected => 1,
            State::Charging => 2,
            State::ChargingCompleted => 3,
            State::Error => 4,
        }
    }

    /// States in which a vehicle is known to be plugged in
    pub fn is_vehicle_present(self) -> bool {
        matches!(
            self,
            State::VehicleConnected | State::Charging | State::ChargingCompleted
        )
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::VehicleNotConnected => write!(f, "VEHICLE_NOT_CONNECTED"),
            State::VehicleConnected => write!(f, "VEHICLE_CONNECTED"),
            State::Charging => write!(f, "CHARGING"),
            State::ChargingCompleted => write!(f, "CHARGING_COMPLETED"),
            State::Error => write!(f, "ERROR"),
        }
    }
}

impl std::str::FromStr for State {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "VEHICLE_NOT_CONNECTED" => Ok(State::VehicleNotConnected),
            "VEHICLE_CONNECTED" => Ok(State::VehicleConnected),
            "CHARGING" => Ok(State::Charging),
            "CHARGING_COMPLETED" => Ok(State::ChargingCompleted),
            "ERROR" => Ok(State::Error),
            _ => Err(()),
        }
    }
}

/// A committed state transition, delivered to state change listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub appliance_id: Option<ApplianceId>,
    pub from: State,
    pub to: State,
    pub at: TimestampMs,
}

impl StateChange {
    /// Serialize to a single JSON line for telemetry output
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Current Unix timestamp in milliseconds
pub fn unix_millis() -> TimestampMs {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display_roundtrips_through_from_str() {
        for state in State::ALL {
            let parsed: State = state.to_string().parse().unwrap();
            assert_eq!(parsed, state);
        }
        assert!("PLUGGED".parse::<State>().is_err());
    }

    #[test]
    fn test_state_index_matches_all() {
        for (i, state) in State::ALL.iter().enumerate() {
            assert_eq!(state.index(), i);
        }
    }

    #[test]
    fn test_state_change_json() {
        let change = StateChange {
            appliance_id: Some("F-00000001-000000000001-00".to_string()),
            from: State::VehicleConnected,
            to: State::Charging,
            at: 1_000_000,
        };

        let json = change.to_json().unwrap();
        assert!(json.contains("\"from\":\"VEHICLE_CONNECTED\""));
        assert!(json.contains("\"to\":\"CHARGING\""));
    }

    #[test]
    fn test_default_state_is_not_connected() {
        assert_eq!(State::default(), State::VehicleNotConnected);
        assert!(!State::VehicleNotConnected.is_vehicle_present());
        assert!(State::ChargingCompleted.is_vehicle_present());
        assert!(!State::Error.is_vehicle_present());
    }
}
