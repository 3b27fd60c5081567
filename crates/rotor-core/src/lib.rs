//! Core types and traits for the Rotor multirotor flight simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the dynamics model and the execution engine:
//! step identifiers, poses, vehicle state, motor commands, published
//! snapshots, airframe layouts, vehicle parameters, error types, and the
//! [`Dynamics`] trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod command;
pub mod error;
pub mod frame;
pub mod id;
pub mod params;
pub mod pose;
pub mod snapshot;
pub mod state;
pub mod traits;

pub use command::{MotorCommand, MotorValues};
pub use error::{CommandError, ConfigError};
pub use frame::FrameSpec;
pub use id::StepId;
pub use params::VehicleParameters;
pub use pose::Pose;
pub use snapshot::{GimbalState, KinematicsSnapshot};
pub use state::{Transition, VehicleState};
pub use traits::Dynamics;
