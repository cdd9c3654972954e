//! EVC Node - host process for a charger supervisor
//!
//! Wires a simulated charge point to a supervisor, drives `update_state`
//! from a scheduling loop and plays one scripted charging session.
//!
//! # Usage
//!
//! ```bash
//! # Default session: plug in, start, charge, complete, unplug
//! evc-node --appliance F-00000001-000000000001-00
//!
//! # Hardware never confirms charging: start attempt is abandoned
//! evc-node --appliance F-00000001-000000000001-00 --start-lag 0 --detection-delay 5
//!
//! # JSON state change telemetry
//! evc-node --appliance F-00000001-000000000001-00 --json
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use evc_core::{
    unix_millis, ChargerConfig, ChargerSupervisor, Control, SharedSupervisor,
    SimulatedChargePoint, State, StateChange, SystemClock,
};
use tokio::time::{interval, sleep};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

type Supervisor = SharedSupervisor<SimulatedChargePoint, SystemClock>;

/// EV charger supervisor node
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Appliance identifier
    #[arg(short, long, default_value = "F-00000001-000000000001-00")]
    appliance: String,

    /// Vehicle status poll interval (seconds)
    #[arg(long, default_value = "5")]
    poll_interval: u64,

    /// Seconds the hardware may take to report charging after a start command
    #[arg(long, default_value = "10")]
    detection_delay: u32,

    /// Host loop period (milliseconds)
    #[arg(long, default_value = "500")]
    tick_ms: u64,

    /// Seconds until the simulated hardware reports charging (0 = never)
    #[arg(long, default_value = "3")]
    start_lag: u64,

    /// Seconds of charging before the vehicle reports completion
    #[arg(long, default_value = "10")]
    charge_secs: u64,

    /// Raise a hardware fault for this many seconds while charging
    #[arg(long)]
    fault_secs: Option<u64>,

    /// Print state changes as JSON lines
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Setup logging
    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("EVC node \"{}\" starting", args.appliance);

    let charge_point = Arc::new(SimulatedChargePoint::new(args.poll_interval));
    let config = ChargerConfig::new(&args.appliance)
        .with_start_charging_state_detection_delay(args.detection_delay);

    let mut supervisor = ChargerSupervisor::new(charge_point.clone(), config, SystemClock);
    let json = args.json;
    supervisor.add_state_changed_listener(Box::new(move |change: &StateChange| {
        if json {
            match change.to_json() {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Failed to encode state change: {}", e),
            }
        }
    }));
    supervisor.init()?;
    let supervisor = supervisor.into_shared();

    // Host scheduling loop
    let loop_supervisor = supervisor.clone();
    let tick = Duration::from_millis(args.tick_ms.max(1));
    let host_loop = tokio::spawn(async move {
        let mut ticker = interval(tick);
        let mut was_on = false;
        loop {
            ticker.tick().await;
            let now = unix_millis();
            let mut supervisor = loop_supervisor.lock();
            supervisor.update_state(now);

            let on = supervisor.is_on(now);
            if on != was_on {
                info!("Load {}", if on { "energized" } else { "released" });
                was_on = on;
            }
        }
    });

    run_session(&args, &charge_point, &supervisor).await;

    host_loop.abort();
    let mut supervisor = supervisor.lock();
    supervisor.shutdown();

    for state in State::ALL {
        info!(
            "{:<22} visits={} once={}",
            state.to_string(),
            supervisor.visit_count(state),
            supervisor.was_in_state_one_time(state)
        );
    }

    Ok(())
}

/// Play one charging session against the simulated charge point
async fn run_session(args: &Args, charge_point: &SimulatedChargePoint, supervisor: &Supervisor) {
    let settle = Duration::from_millis(args.tick_ms.max(1) * 2);

    sleep(settle).await;
    info!("Scenario: vehicle plugged in");
    charge_point.plug_in();
    sleep(settle).await;

    info!("Scenario: start charging");
    supervisor.lock().start_charging();

    if args.start_lag == 0 {
        // Hardware never confirms; wait for the attempt to be abandoned
        sleep(Duration::from_secs(u64::from(args.detection_delay)) + settle).await;
        info!("Scenario: state after unconfirmed start is {}", supervisor.lock().state());
    } else {
        sleep(Duration::from_secs(args.start_lag)).await;
        info!("Scenario: hardware reports charging");
        charge_point.set_charging(true);

        if let Some(fault_secs) = args.fault_secs {
            sleep(settle).await;
            info!("Scenario: hardware fault raised");
            charge_point.set_fault(true);
            sleep(Duration::from_secs(fault_secs)).await;
            info!("Scenario: hardware fault cleared");
            charge_point.set_fault(false);
        }

        sleep(Duration::from_secs(args.charge_secs)).await;
        info!("Scenario: vehicle reports charging completed");
        charge_point.complete_charging();
        sleep(settle).await;
    }

    info!("Scenario: vehicle unplugged");
    charge_point.unplug();
    sleep(settle).await;
}
