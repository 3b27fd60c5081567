//! Rotor supervised flight: a consumer loop polling a threaded worker.
//!
//! Demonstrates:
//!   1. Building a vehicle from the variant registry
//!   2. Running it on the simulation thread under a `SimulationSupervisor`
//!   3. Polling snapshots at a consumer rate unrelated to the step rate
//!   4. Cutting the motors, crashing, and the automatic restart
//!   5. Stopping the worker and reading its metrics
//!
//! Run with:
//!   cargo run -p rotor-engine --example supervised_flight

use std::thread;
use std::time::Duration;

use nalgebra::Vector3;
use rotor_core::Pose;
use rotor_dynamics::{Environment, VehicleKind};
use rotor_engine::{SimulationSupervisor, WorkerConfig};

// ─── Settings ───────────────────────────────────────────────────

const START_ALTITUDE: f64 = 3.0;
const CONSUMER_HZ: u64 = 30;
const HOVER_TICKS: u32 = 30;
const MAX_TICKS: u32 = 300;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = Environment::default();
    let kind = VehicleKind::BigQuad;
    let hover = kind
        .create(env)?
        .hover_command()
        .ok_or("vehicle cannot hover in this environment")?;

    let config = WorkerConfig {
        dt: 0.002,
        realtime_factor: 2.0,
        ..WorkerConfig::default()
    };
    let start = Pose::level(Vector3::new(0.0, 0.0, START_ALTITUDE));
    let mut supervisor = SimulationSupervisor::new(move || kind.create(env), start, config);
    supervisor.start()?;
    supervisor.set_gimbal(0.0, -30.0);

    println!("{kind} at {START_ALTITUDE} m, hover throttle {:.3}", hover.values()[0]);
    println!("{:>5} {:>7} {:>9} {:>8} {:>8}", "tick", "step", "altitude", "motors", "crashed");

    for tick in 0..MAX_TICKS {
        // Hover first, then cut the motors.
        let throttle = if tick < HOVER_TICKS { hover.values() } else { &[0.0; 4][..] };
        supervisor.set_motors(throttle)?;

        let snap = supervisor.poll()?;
        println!(
            "{:>5} {:>7} {:>9.3} {:>8.3} {:>8}",
            tick,
            snap.step,
            snap.position.z,
            snap.motor_mean() / kind.parameters().max_motor_rate(),
            snap.crashed
        );
        if supervisor.restarts() > 0 {
            println!("crashed and restarted from the start pose");
            break;
        }
        thread::sleep(Duration::from_millis(1000 / CONSUMER_HZ));
    }

    if let Some(worker) = supervisor.worker() {
        let m = worker.metrics();
        println!(
            "steps {} overruns {} commands {}/{} rejected, max step {} us",
            m.steps, m.overruns, m.commands_applied, m.commands_rejected, m.max_step_us
        );
    }
    let report = supervisor.stop()?;
    println!("stopped at step {} in {} ms", report.final_step, report.total_ms);
    Ok(())
}
