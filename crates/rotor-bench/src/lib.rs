//! Benchmark profiles for the Rotor flight simulator.
//!
//! Provides pre-built vehicles and flight setups shared by the benches:
//!
//! - [`reference_profile`]: BigQuad at 10 m, 1 kHz, hover command
//! - [`hex_profile`]: HexX with an asymmetric command that rolls and yaws
//! - [`fast_worker_config`]: worker settings that step as fast as possible

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use nalgebra::Vector3;
use rotor_core::{CommandError, ConfigError, MotorCommand, Pose};
use rotor_dynamics::{Environment, MultirotorDynamics, VehicleKind};
use rotor_engine::WorkerConfig;

/// Timestep used by every profile.
pub const BENCH_DT: f64 = 0.001;

/// Why a profile could not be built.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// The vehicle preset failed validation.
    Vehicle(ConfigError),
    /// The profile's command was malformed.
    Command(CommandError),
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vehicle(e) => write!(f, "vehicle: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Vehicle(e) => Some(e),
            Self::Command(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ProfileError {
    fn from(e: ConfigError) -> Self {
        Self::Vehicle(e)
    }
}

impl From<CommandError> for ProfileError {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

/// A vehicle, its start pose and the command it flies.
pub struct FlightProfile {
    /// The flight model.
    pub model: MultirotorDynamics,
    /// Start pose.
    pub start: Pose,
    /// Command held for the whole run.
    pub command: MotorCommand,
}

/// BigQuad hovering at 10 m.
pub fn reference_profile() -> Result<FlightProfile, ProfileError> {
    let model = VehicleKind::BigQuad.create(Environment::default())?;
    let command = model
        .hover_command()
        .unwrap_or_else(|| MotorCommand::uniform(model.parameters().motor_count(), 1.0));
    Ok(FlightProfile {
        model,
        start: Pose::level(Vector3::new(0.0, 0.0, 10.0)),
        command,
    })
}

/// HexX at 50 m with uneven throttles, exercising every wrench term.
pub fn hex_profile() -> Result<FlightProfile, ProfileError> {
    let model = VehicleKind::HexX.create(Environment::default())?;
    let command = MotorCommand::new(&[0.72, 0.70, 0.69, 0.71, 0.73, 0.68])?;
    Ok(FlightProfile {
        model,
        start: Pose::level(Vector3::new(0.0, 0.0, 50.0)),
        command,
    })
}

/// Worker settings with a pacing budget far below the step cost, so the
/// simulation thread never parks for long.
pub fn fast_worker_config() -> WorkerConfig {
    WorkerConfig {
        dt: BENCH_DT,
        realtime_factor: 1.0e6,
        snapshot_history: 64,
        ..WorkerConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotor_core::Dynamics;

    #[test]
    fn profiles_build() {
        let reference = reference_profile().unwrap();
        assert_eq!(reference.command.len(), reference.model.motor_count());
        let hex = hex_profile().unwrap();
        assert_eq!(hex.command.len(), 6);
        assert_eq!(hex.model.motor_count(), 6);
    }

    #[test]
    fn profile_error_keeps_its_cause() {
        use std::error::Error;
        let err = ProfileError::from(MotorCommand::new(&[f64::NAN]).unwrap_err());
        assert!(matches!(err, ProfileError::Command(CommandError::NonFinite { motor: 0 })));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("command: "));
    }

    #[test]
    fn fast_worker_config_validates() {
        fast_worker_config().validate().unwrap();
    }
}
