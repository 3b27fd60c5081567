//! Test utilities and test-double dynamics models for Rotor development.
//!
//! The doubles implement [`Dynamics`](rotor_core::Dynamics) with
//! trajectories that are trivial to predict, so engine tests can check
//! pacing, publication and lifecycle behavior without reasoning about
//! flight physics.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{CounterDynamics, PanickingDynamics, SinkingDynamics, StallingDynamics};

use nalgebra::Vector3;
use rotor_core::Pose;

/// Level pose at altitude `z` above the origin.
pub fn pose_at(z: f64) -> Pose {
    Pose::level(Vector3::new(0.0, 0.0, z))
}
