//! Error types for the charger supervisor
//!
//! Hardware faults and confirmation timeouts are not errors: the former is the
//! [`State::Error`](crate::State::Error) state, the latter an abandoned
//! charging attempt. Only startup can fail.

use thiserror::Error;

/// Inconsistent charge point or supervisor configuration, detected at startup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("vehicle status poll interval must be at least one second")]
    ZeroPollInterval,

    #[error("appliance id must not be empty")]
    EmptyApplianceId,

    #[error("missing driver setting: {0}")]
    MissingSetting(String),

    #[error("invalid driver setting {name}: {reason}")]
    InvalidSetting { name: String, reason: String },
}

/// Errors raised by the supervisor lifecycle
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("vehicle status poller needs a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

pub type Result<T> = std::result::Result<T, Error>;
