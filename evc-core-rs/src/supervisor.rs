//! Charger supervisor
//!
//! Aggregate core owning the current state, the start-charging confirmation
//! window and the visit tracker. Driven by a host scheduling loop through
//! [`ChargerSupervisor::update_state`]; read by the control framework through
//! [`Control::is_on`].
//!
//! All mutation goes through `&mut self`. Hosts that drive a supervisor from
//! several tasks share it as a [`SharedSupervisor`].

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::ChargerConfig;
use crate::error::Result;
use crate::evaluator::{next_state, StateSlot};
use crate::poller::{Poller, PollerHandle, SharedApplianceId};
use crate::signal::{SignalSource, Signals};
use crate::types::{ApplianceId, State, StateChange, TimestampMs};
use crate::visits::VisitTracker;
use crate::window::{self, ConfirmationWindow};

/// Callback invoked on every committed state transition
pub type StateChangeListener = Box<dyn Fn(&StateChange) + Send + Sync>;

/// Supervisor shared between host tasks
pub type SharedSupervisor<S, C = SystemClock> = Arc<Mutex<ChargerSupervisor<S, C>>>;

/// On/off control consumed by the appliance control framework
pub trait Control {
    /// Whether the load should be energized at `now`
    fn is_on(&self, now: TimestampMs) -> bool;

    fn add_state_changed_listener(&mut self, listener: StateChangeListener);
}

/// Supervisory state machine for one charge point
pub struct ChargerSupervisor<S: SignalSource + ?Sized, C: Clock = SystemClock> {
    appliance_id: SharedApplianceId,
    config: ChargerConfig,
    source: Arc<S>,
    clock: C,

    slot: StateSlot,
    window: ConfirmationWindow,
    visits: VisitTracker,

    listeners: Vec<StateChangeListener>,
    poller: Option<PollerHandle>,
}

impl<S, C> ChargerSupervisor<S, C>
where
    S: SignalSource + ?Sized + 'static,
    C: Clock + Clone + 'static,
{
    /// Create a supervisor in `VehicleNotConnected`
    pub fn new(source: Arc<S>, config: ChargerConfig, clock: C) -> Self {
        if let Some(ref id) = config.appliance_id {
            source.set_appliance_id(id);
        }

        let initial = State::default();
        Self {
            appliance_id: Arc::new(RwLock::new(config.appliance_id.clone())),
            window: ConfirmationWindow::new(config.start_charging_state_detection_delay),
            config,
            source,
            clock,
            slot: StateSlot::new(initial),
            visits: VisitTracker::starting_in(initial),
            listeners: Vec::new(),
            poller: None,
        }
    }

    /// Associate with an appliance and propagate the id to the signal source
    pub fn set_appliance_id(&mut self, appliance_id: impl Into<ApplianceId>) {
        let appliance_id = appliance_id.into();
        self.source.set_appliance_id(&appliance_id);
        self.config.appliance_id = Some(appliance_id.clone());
        *self.appliance_id.write() = Some(appliance_id);
    }

    pub fn appliance_id(&self) -> Option<ApplianceId> {
        self.appliance_id.read().clone()
    }

    pub fn config(&self) -> &ChargerConfig {
        &self.config
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Validate configuration and start the vehicle presence poller
    ///
    /// Must be called from within a tokio runtime. Fails fast on an invalid
    /// driver configuration.
    pub fn init(&mut self) -> Result<()> {
        debug!("{}: Initializing ...", self.label());
        self.config.validate()?;
        self.source.validate()?;

        let poller = Poller::new(self.source.clone(), self.clock.clone())
            .with_appliance_id(self.appliance_id.clone())
            .start()?;
        info!(
            "{}: Polling vehicle status every {}s",
            self.label(),
            poller.period().as_secs()
        );
        self.poller = Some(poller);
        Ok(())
    }

    /// Stop the presence poller
    pub fn shutdown(&mut self) {
        if self.poller.take().is_some() {
            debug!("{}: Shut down", self.label());
        }
    }

    /// The running presence poller, if initialized
    pub fn poller(&self) -> Option<&PollerHandle> {
        self.poller.as_ref()
    }

    /// Advance the state machine one tick
    ///
    /// Returns whether the supervisor is settled: false while a start attempt
    /// is neither confirmed nor expired. Repeated calls with unchanged signals
    /// and `now` have no further effect.
    ///
    /// `now` stamps emitted state changes. The confirmation window is measured
    /// on the supervisor clock, the time base `start_charging` opened it on.
    pub fn update_state(&mut self, now: TimestampMs) -> bool {
        let signals = Signals::sample(self.source.as_ref());
        let next = next_state(self.slot, &signals);
        let settled = self.settle_charging_attempt(next.current, self.clock.now_millis());
        self.commit(next, now);
        settled
    }

    /// Command the hardware to start charging and open a confirmation window
    pub fn start_charging(&mut self) {
        let now = self.clock.now_millis();
        info!(
            "{}: Start charging, awaiting confirmation for {}s",
            self.label(),
            self.window.delay_secs()
        );
        self.source.start_charging();
        self.window.open(now);
    }

    /// Control output
    ///
    /// The confirmation window is checked against the supervisor clock; the
    /// host's `now` is not compared with the attempt start.
    pub fn is_on(&self, _now: TimestampMs) -> bool {
        window::is_on(
            self.slot.current,
            self.window.delay_secs(),
            self.clock.now_millis(),
            self.window.started_at(),
        )
    }

    pub fn state(&self) -> State {
        self.slot.current
    }

    /// State an active fault preempted
    pub fn preempted_state(&self) -> Option<State> {
        self.slot.preempted
    }

    /// When the pending start attempt was issued
    pub fn charging_attempt_started_at(&self) -> Option<TimestampMs> {
        self.window.started_at()
    }

    /// Force a state, bypassing signal evaluation
    pub fn set_state(&mut self, state: State) {
        let now = self.clock.now_millis();
        let next = self.slot.forced(state);
        self.commit(next, now);
    }

    pub fn was_in_state(&self, state: State) -> bool {
        self.visits.was_in_state(state)
    }

    pub fn was_in_state_one_time(&self, state: State) -> bool {
        self.visits.was_in_state_one_time(state)
    }

    pub fn visit_count(&self, state: State) -> u32 {
        self.visits.visit_count(state)
    }

    /// Wrap for use from several host tasks
    pub fn into_shared(self) -> SharedSupervisor<S, C> {
        Arc::new(Mutex::new(self))
    }

    fn settle_charging_attempt(&mut self, next: State, now: TimestampMs) -> bool {
        let Some(started) = self.window.started_at() else {
            return true;
        };

        match next {
            State::Charging => {
                debug!(
                    "{}: Charging confirmed after {} ms",
                    self.label(),
                    now.saturating_sub(started)
                );
                self.window.clear();
                true
            }
            State::VehicleNotConnected | State::Error => {
                info!("{}: Start attempt abandoned, state is {}", self.label(), next);
                self.window.clear();
                true
            }
            _ if self.window.is_open(now) => {
                debug!("{}: Waiting for charging to be reported", self.label());
                false
            }
            _ => {
                info!(
                    "{}: Charging not reported within {}s, start attempt abandoned",
                    self.label(),
                    self.window.delay_secs()
                );
                self.window.clear();
                true
            }
        }
    }

    fn commit(&mut self, next: StateSlot, now: TimestampMs) {
        let previous = self.slot.current;
        self.slot = next;
        if next.current == previous {
            return;
        }

        self.visits.record_entry(next.current);
        info!("{}: State changed: {} -> {}", self.label(), previous, next.current);

        let change = StateChange {
            appliance_id: self.appliance_id(),
            from: previous,
            to: next.current,
            at: now,
        };
        for listener in &self.listeners {
            listener(&change);
        }
    }

    fn label(&self) -> String {
        self.appliance_id().unwrap_or_else(|| "-".to_string())
    }
}

impl<S, C> Control for ChargerSupervisor<S, C>
where
    S: SignalSource + ?Sized + 'static,
    C: Clock + Clone + 'static,
{
    fn is_on(&self, now: TimestampMs) -> bool {
        ChargerSupervisor::is_on(self, now)
    }

    fn add_state_changed_listener(&mut self, listener: StateChangeListener) {
        self.listeners.push(listener);
    }
}

impl<S: SignalSource + ?Sized, C: Clock> std::fmt::Debug for ChargerSupervisor<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChargerSupervisor")
            .field("appliance_id", &*self.appliance_id.read())
            .field("slot", &self.slot)
            .field("window", &self.window)
            .field("visits", &self.visits)
            .field("listeners", &self.listeners.len())
            .field("poller", &self.poller)
            .finish()
    }
}
