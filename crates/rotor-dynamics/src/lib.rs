//! Multirotor flight dynamics for the Rotor simulator.
//!
//! [`MultirotorDynamics`] implements [`rotor_core::Dynamics`] for any
//! airframe described by a [`VehicleParameters`](rotor_core::VehicleParameters).
//! Each step runs, in order:
//!
//! 1. motor lag: each motor speed approaches its commanded rate with a
//!    first-order response
//! 2. mixing: per-motor thrust and reaction torque summed into a body wrench
//! 3. equations of motion: gravity, rotated thrust, Euler's equations with
//!    rotor gyroscopic coupling
//! 4. semi-implicit Euler integration with a renormalized quaternion
//! 5. ground contact and crash detection
//!
//! Built-in airframes are listed by [`VehicleKind`]; [`VariantRegistry`]
//! resolves selector strings and accepts additional parameter sets.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod environment;
pub mod integrator;
pub mod mixer;
pub mod model;
pub mod motor;
pub mod variants;

pub use environment::{Environment, STANDARD_GRAVITY};
pub use mixer::{Mixer, Wrench};
pub use model::MultirotorDynamics;
pub use variants::{VariantRegistry, VehicleKind};
