//! Simulation thread counters.
//!
//! The simulation thread updates [`MetricsCounters`] with relaxed atomic
//! stores; [`FlightWorker::metrics()`](crate::worker::FlightWorker::metrics)
//! copies them into a plain [`WorkerMetrics`] value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Point-in-time copy of the worker counters.
///
/// Counters are cumulative since the worker was created. Individual
/// fields are read independently and may be skewed by one step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkerMetrics {
    /// Steps executed.
    pub steps: u64,
    /// Steps whose execution exceeded the pacing budget.
    pub overruns: u64,
    /// Motor commands taken from the mailbox and applied.
    pub commands_applied: u64,
    /// Motor commands replaced by a newer one before any step took them.
    pub commands_superseded: u64,
    /// Motor commands rejected at submission.
    pub commands_rejected: u64,
    /// Steps on which the vehicle entered the crashed state.
    pub crashes: u64,
    /// Wall-clock time of the most recent step, in microseconds.
    pub last_step_us: u64,
    /// Longest step so far, in microseconds.
    pub max_step_us: u64,
}

/// Shared atomic counters behind [`WorkerMetrics`].
#[derive(Debug, Default)]
pub struct MetricsCounters {
    steps: AtomicU64,
    overruns: AtomicU64,
    commands_applied: AtomicU64,
    commands_superseded: AtomicU64,
    commands_rejected: AtomicU64,
    crashes: AtomicU64,
    last_step_us: AtomicU64,
    max_step_us: AtomicU64,
}

impl MetricsCounters {
    /// Zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one executed step that took `elapsed` against `budget`.
    pub fn record_step(&self, elapsed: Duration, budget: Duration) {
        let us = elapsed.as_micros() as u64;
        self.steps.fetch_add(1, Ordering::Relaxed);
        self.last_step_us.store(us, Ordering::Relaxed);
        self.max_step_us.fetch_max(us, Ordering::Relaxed);
        if elapsed > budget {
            self.overruns.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record one command applied by the simulation thread.
    pub fn record_applied(&self) {
        self.commands_applied.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one pending command replaced before it was applied.
    pub fn record_superseded(&self) {
        self.commands_superseded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one command rejected at submission.
    pub fn record_rejected(&self) {
        self.commands_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a transition into the crashed state.
    pub fn record_crash(&self) {
        self.crashes.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> WorkerMetrics {
        WorkerMetrics {
            steps: self.steps.load(Ordering::Relaxed),
            overruns: self.overruns.load(Ordering::Relaxed),
            commands_applied: self.commands_applied.load(Ordering::Relaxed),
            commands_superseded: self.commands_superseded.load(Ordering::Relaxed),
            commands_rejected: self.commands_rejected.load(Ordering::Relaxed),
            crashes: self.crashes.load(Ordering::Relaxed),
            last_step_us: self.last_step_us.load(Ordering::Relaxed),
            max_step_us: self.max_step_us.load(Ordering::Relaxed),
        }
    }
}
