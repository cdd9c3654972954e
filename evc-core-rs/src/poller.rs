//! Vehicle presence poller
//!
//! Lightweight heartbeat that samples `is_vehicle_connected` on a fixed
//! interval reported by the signal source. It records and logs each sample
//! and never touches the supervisor's state.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::{ConfigurationError, Result};
use crate::signal::SignalSource;
use crate::types::{ApplianceId, TimestampMs};

/// One presence reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceSample {
    pub connected: bool,
    pub at: TimestampMs,
}

#[derive(Debug, Default)]
struct PollerState {
    last_sample: Option<PresenceSample>,
    ticks: u64,
}

/// Appliance id shared with a running poller, so renames reach its logs
pub type SharedApplianceId = Arc<RwLock<Option<ApplianceId>>>;

/// Presence poller, not yet running
pub struct Poller<S: SignalSource + ?Sized, C: Clock> {
    source: Arc<S>,
    clock: C,
    appliance_id: SharedApplianceId,
}

impl<S, C> Poller<S, C>
where
    S: SignalSource + ?Sized + 'static,
    C: Clock + 'static,
{
    pub fn new(source: Arc<S>, clock: C) -> Self {
        Self {
            source,
            clock,
            appliance_id: Arc::new(RwLock::new(None)),
        }
    }

    /// Prefix log lines with the appliance id, read on every tick
    pub fn with_appliance_id(mut self, appliance_id: SharedApplianceId) -> Self {
        self.appliance_id = appliance_id;
        self
    }

    /// Spawn the polling task on the current tokio runtime
    ///
    /// The first poll happens immediately, then every
    /// `vehicle_status_poll_interval` seconds. The driver query runs on the
    /// blocking pool, so a slow driver delays only its own tick.
    pub fn start(self) -> Result<PollerHandle> {
        let period_secs = self.source.vehicle_status_poll_interval();
        if period_secs == 0 {
            return Err(ConfigurationError::ZeroPollInterval.into());
        }
        let runtime = tokio::runtime::Handle::try_current()?;

        let state = Arc::new(RwLock::new(PollerState::default()));
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task_state = state.clone();
        let appliance_id = self.appliance_id;
        let task_appliance_id = appliance_id.clone();
        let source = self.source;
        let clock = self.clock;

        let task = runtime.spawn(async move {
            let mut ticker = interval(Duration::from_secs(period_secs));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let query = source.clone();
                        let connected = tokio::task::spawn_blocking(move || query.is_vehicle_connected()).await;
                        let label = label(&task_appliance_id);
                        let connected = match connected {
                            Ok(connected) => connected,
                            Err(e) => {
                                warn!("{}: Vehicle status poll failed: {}", label, e);
                                continue;
                            }
                        };
                        debug!("{}: vehicleConnected = {}", label, connected);

                        let mut state = task_state.write();
                        state.last_sample = Some(PresenceSample {
                            connected,
                            at: clock.now_millis(),
                        });
                        state.ticks += 1;
                    }

                    _ = shutdown_rx.changed() => {
                        debug!("{}: Vehicle status poller stopped", label(&task_appliance_id));
                        break;
                    }
                }
            }
        });

        Ok(PollerHandle {
            period: Duration::from_secs(period_secs),
            state,
            appliance_id,
            shutdown_tx,
            task: Some(task),
        })
    }
}

fn label(appliance_id: &SharedApplianceId) -> String {
    appliance_id.read().clone().unwrap_or_else(|| "-".to_string())
}

/// Running poller; aborted when dropped
#[derive(Debug)]
pub struct PollerHandle {
    period: Duration,
    state: Arc<RwLock<PollerState>>,
    appliance_id: SharedApplianceId,
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Most recent presence reading
    pub fn last_sample(&self) -> Option<PresenceSample> {
        self.state.read().last_sample
    }

    /// Appliance id currently used in poll logs
    pub fn appliance_id(&self) -> Option<ApplianceId> {
        self.appliance_id.read().clone()
    }

    /// Number of completed polls
    pub fn ticks(&self) -> u64 {
        self.state.read().ticks
    }

    /// Stop polling and wait for the task to finish
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
