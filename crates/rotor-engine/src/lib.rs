//! Simulation engine driving Rotor flight dynamics.
//!
//! [`FlightEngine`] is the fixed-timestep step loop around any
//! [`Dynamics`](rotor_core::Dynamics) model. It runs in two modes:
//!
//! - [`LockstepFlight`]: the caller steps the engine explicitly, one step
//!   per call. Fully deterministic; used by tests, benches and hosts that
//!   own their clock.
//! - [`FlightWorker`]: a dedicated simulation thread steps the engine at
//!   `dt / realtime_factor` wall time and publishes immutable snapshots
//!   that any consumer thread reads without blocking the producer.
//!
//! [`SimulationSupervisor`] wraps a worker with crash handling: a crashed
//! vehicle is replaced by a fresh model at the recorded start pose.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod ingress;
pub mod lockstep;
pub mod metrics;
pub mod ring;
mod sim_thread;
pub mod supervisor;
pub mod worker;

pub use config::{WorkerConfig, WorkerConfigError};
pub use engine::{FlightEngine, StepOutcome};
pub use ingress::CommandSender;
pub use lockstep::LockstepFlight;
pub use metrics::WorkerMetrics;
pub use ring::SnapshotRing;
pub use supervisor::{SimulationSupervisor, SupervisorError};
pub use worker::{FlightWorker, StopReport, WorkerError, WorkerState};
