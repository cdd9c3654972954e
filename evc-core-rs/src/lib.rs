//! EVC Core Library
//!
//! Supervisory state machine for an EV charge point attached to a home
//! energy-management controller. Derives the charge point's operating phase
//! from sampled hardware signals and exposes the single "energize the load"
//! output consumed by the appliance control framework.
//!
//! ## Architecture
//!
//! ```text
//! Host scheduling loop            Control framework
//!       │ update_state(now)              ▲ is_on(now)
//!       ▼                                │
//! ┌──────────────────────────────────────┴──┐
//! │            ChargerSupervisor            │
//! │  ┌───────────┐ ┌──────────┐ ┌────────┐  │
//! │  │ Evaluator │ │ Confirm. │ │ Visit  │  │
//! │  │ next_state│ │ window   │ │ tracker│  │
//! │  └─────┬─────┘ └──────────┘ └────────┘  │
//! └────────┼────────────────────────────────┘
//!          │ sampled predicates      ▲ Poller (presence heartbeat)
//!          ▼                         │
//! ┌─────────────────────────────────────────┐
//! │   SignalSource (hardware driver)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use evc_core::{ChargerConfig, ChargerSupervisor, SimulatedChargePoint, SystemClock, unix_millis};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = Arc::new(SimulatedChargePoint::new(10));
//!     let config = ChargerConfig::new("F-00000001-000000000001-00");
//!
//!     let mut supervisor = ChargerSupervisor::new(source.clone(), config, SystemClock);
//!     supervisor.init()?;
//!
//!     source.plug_in();
//!     supervisor.update_state(unix_millis());
//!     supervisor.start_charging();
//!
//!     Ok(())
//! }
//! ```

pub mod types;
pub mod error;
pub mod config;
pub mod clock;
pub mod signal;
pub mod evaluator;
pub mod window;
pub mod visits;
pub mod poller;
pub mod supervisor;
pub mod sim;

pub use types::*;
pub use error::{ConfigurationError, Error, Result};
pub use config::ChargerConfig;
pub use clock::{Clock, ManualClock, SystemClock};
pub use signal::{SignalSource, Signals};
pub use evaluator::{next_state, StateSlot};
pub use window::{is_on, is_within_confirmation_window, ConfirmationWindow};
pub use visits::VisitTracker;
pub use poller::{Poller, PollerHandle, PresenceSample, SharedApplianceId};
pub use supervisor::{ChargerSupervisor, Control, SharedSupervisor, StateChangeListener};
pub use sim::SimulatedChargePoint;
