//! Error types shared across the Rotor workspace.
//!
//! Split by where the failure is detected: [`ConfigError`] at
//! construction (fatal, propagated synchronously to the caller) and
//! [`CommandError`] at command submission (rejected locally, the
//! previously accepted command stays in effect).

use std::error::Error;
use std::fmt;

/// Errors detected while validating vehicle configuration.
///
/// Always fatal for the object being constructed: nothing falls back
/// to a default parameter set.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The vehicle selector does not name a registered variant.
    UnknownVehicle {
        /// The selector that failed to resolve.
        name: String,
    },
    /// A variant with this name is already registered.
    DuplicateVehicle {
        /// The conflicting name.
        name: String,
    },
    /// The airframe has zero motors.
    NoMotors,
    /// Per-motor tables of the airframe disagree on the motor count.
    FrameMismatch {
        /// Number of spin directions.
        directions: usize,
        /// Number of motor azimuths.
        azimuths: usize,
    },
    /// A spin direction is not exactly +1 or -1.
    InvalidDirection {
        /// Index of the offending motor.
        motor: usize,
        /// The value found.
        value: f64,
    },
    /// A physical constant is non-finite or not strictly positive.
    InvalidParameter {
        /// Name of the constant.
        name: &'static str,
        /// The value found.
        value: f64,
    },
    /// The environment (gravity, ground level) is invalid.
    InvalidEnvironment {
        /// Description of which invariant was violated.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVehicle { name } => write!(f, "unknown vehicle variant '{name}'"),
            Self::DuplicateVehicle { name } => {
                write!(f, "vehicle variant '{name}' is already registered")
            }
            Self::NoMotors => write!(f, "airframe must have at least one motor"),
            Self::FrameMismatch {
                directions,
                azimuths,
            } => write!(
                f,
                "airframe has {directions} spin directions but {azimuths} motor azimuths"
            ),
            Self::InvalidDirection { motor, value } => {
                write!(f, "motor {motor} spin direction must be +1 or -1, got {value}")
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::InvalidEnvironment { reason } => write!(f, "invalid environment: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Errors from submitting a motor command.
///
/// A rejected command never reaches the simulation loop; the last
/// accepted command keeps driving the motors.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandError {
    /// The command length differs from the configured motor count.
    Shape {
        /// Motor count of the configured vehicle.
        expected: usize,
        /// Length of the submitted command.
        got: usize,
    },
    /// A command value is NaN or infinite.
    NonFinite {
        /// Index of the first non-finite value.
        motor: usize,
    },
    /// The simulation thread has shut down.
    Shutdown,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape { expected, got } => {
                write!(f, "motor command has {got} values, vehicle has {expected} motors")
            }
            Self::NonFinite { motor } => write!(f, "motor command value {motor} is not finite"),
            Self::Shutdown => write!(f, "simulation thread has shut down"),
        }
    }
}

impl Error for CommandError {}
