//! Paced step loop run on the dedicated simulation thread.
//!
//! The thread owns the [`FlightEngine`] exclusively (moved in via
//! `thread::Builder::spawn`). Per iteration it takes the pending command
//! from the mailbox, reads the gimbal, steps once, publishes the snapshot, and
//! parks until the step deadline. The park is the only suspension
//! point; `unpark()` from [`FlightWorker::stop()`](crate::worker::FlightWorker::stop)
//! ends it early.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use rotor_core::{GimbalState, MotorCommand};

use crate::engine::FlightEngine;
use crate::ingress;
use crate::metrics::MetricsCounters;
use crate::ring::SnapshotRing;

/// Gimbal state shared between consumers (writers) and the simulation
/// thread (reader).
#[derive(Debug, Default)]
pub(crate) struct SharedGimbal(Mutex<GimbalState>);

impl SharedGimbal {
    pub fn get(&self) -> GimbalState {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, gimbal: GimbalState) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = gimbal;
    }
}

/// State held by the simulation thread's main loop.
pub(crate) struct SimThreadState {
    engine: FlightEngine,
    ring: Arc<SnapshotRing>,
    cmd_rx: Receiver<MotorCommand>,
    gimbal: Arc<SharedGimbal>,
    counters: Arc<MetricsCounters>,
    shutdown_flag: Arc<AtomicBool>,
    sim_stopped: Arc<AtomicBool>,
    step_budget: Duration,
}

impl SimThreadState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        engine: FlightEngine,
        ring: Arc<SnapshotRing>,
        cmd_rx: Receiver<MotorCommand>,
        gimbal: Arc<SharedGimbal>,
        counters: Arc<MetricsCounters>,
        shutdown_flag: Arc<AtomicBool>,
        sim_stopped: Arc<AtomicBool>,
        step_budget: Duration,
    ) -> Self {
        Self {
            engine,
            ring,
            cmd_rx,
            gimbal,
            counters,
            shutdown_flag,
            sim_stopped,
            step_budget,
        }
    }

    /// Main loop. Runs until `shutdown_flag` is set.
    ///
    /// Consumes self and returns the engine through the `JoinHandle`.
    pub fn run(mut self) -> FlightEngine {
        while !self.shutdown_flag.load(Ordering::Acquire) {
            let step_start = Instant::now();

            self.apply_pending_command();
            let gimbal = self.gimbal.get();
            let outcome = self.engine.step();
            self.ring.publish(self.engine.snapshot(gimbal));

            if outcome.newly_crashed {
                self.counters.record_crash();
                log::info!(
                    "vehicle crashed at step {} (t = {:.3} s)",
                    outcome.step,
                    self.engine.sim_time()
                );
            }

            let elapsed = step_start.elapsed();
            self.counters.record_step(elapsed, self.step_budget);

            // Overruns start the next step immediately; lost time is
            // not made up with a burst of catch-up steps.
            self.park_until(step_start.checked_add(self.step_budget));
        }

        self.sim_stopped.store(true, Ordering::Release);
        self.engine
    }

    fn apply_pending_command(&mut self) {
        if let Some(command) = ingress::take_latest(&self.cmd_rx) {
            // Shape was checked at submission against the same motor count.
            if self.engine.set_command(command).is_ok() {
                self.counters.record_applied();
            }
        }
    }

    /// Park until `deadline`, returning early on shutdown. Spurious
    /// wakeups re-park for the remaining time. A deadline past the
    /// range of `Instant` parks until shutdown.
    fn park_until(&self, deadline: Option<Instant>) {
        while !self.shutdown_flag.load(Ordering::Acquire) {
            match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    thread::park_timeout(deadline - now);
                }
                None => thread::park(),
            }
        }
    }
}
