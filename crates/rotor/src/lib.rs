//! Rotor: real-time multirotor flight dynamics.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Rotor sub-crates. For most users, adding `rotor` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use rotor::prelude::*;
//!
//! let model = VehicleKind::BigQuad.create(Environment::default()).unwrap();
//! let hover = model.hover_command().unwrap();
//! let start = Pose::level(Vector3::new(0.0, 0.0, 10.0));
//!
//! let mut flight = LockstepFlight::new(model, start, 0.01).unwrap();
//! let snap = flight.step_n(&hover, 100).unwrap();
//! assert_eq!(snap.step, StepId(100));
//! assert!(!snap.crashed);
//! ```
//!
//! For a free-running simulation, build a [`FlightWorker`](engine::FlightWorker)
//! (or a [`SimulationSupervisor`](engine::SimulationSupervisor) for
//! automatic crash restarts) and read
//! [`kinematics()`](engine::FlightWorker::kinematics) from the consumer
//! thread at any rate.
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `rotor-core` | Pose, state, command and snapshot types, vehicle parameters, errors, the `Dynamics` trait |
//! | [`dynamics`] | `rotor-dynamics` | Multirotor flight model, mixing, integration, vehicle variants |
//! | [`engine`] | `rotor-engine` | Step loop, lockstep and threaded execution, supervision |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`rotor-core`).
///
/// Contains poses, vehicle state, motor commands, kinematics snapshots,
/// airframe layouts, error types, and the [`types::Dynamics`] trait.
pub use rotor_core as types;

/// Multirotor flight model (`rotor-dynamics`).
///
/// [`dynamics::MultirotorDynamics`] implements [`types::Dynamics`];
/// [`dynamics::VehicleKind`] and [`dynamics::VariantRegistry`] build it
/// from named parameter sets.
pub use rotor_dynamics as dynamics;

/// Simulation engines (`rotor-engine`).
///
/// [`engine::LockstepFlight`] for synchronous stepping,
/// [`engine::FlightWorker`] for paced background stepping, and
/// [`engine::SimulationSupervisor`] for crash restarts.
pub use rotor_engine as engine;

/// Common imports for typical Rotor usage.
///
/// ```rust
/// use rotor::prelude::*;
/// ```
pub mod prelude {
    // Math
    pub use nalgebra::{UnitQuaternion, Vector3};

    // Core types and traits
    pub use rotor_core::{
        Dynamics, FrameSpec, GimbalState, KinematicsSnapshot, MotorCommand, Pose, StepId,
        VehicleParameters, VehicleState,
    };

    // Errors
    pub use rotor_core::{CommandError, ConfigError};

    // Dynamics
    pub use rotor_dynamics::{Environment, MultirotorDynamics, VariantRegistry, VehicleKind};

    // Engine
    pub use rotor_engine::{
        FlightWorker, LockstepFlight, SimulationSupervisor, StopReport, SupervisorError,
        WorkerConfig, WorkerConfigError, WorkerError, WorkerMetrics, WorkerState,
    };
}
