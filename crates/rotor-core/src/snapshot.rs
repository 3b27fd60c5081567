//! Published simulation results and the consumer-written gimbal state.

use nalgebra::{UnitQuaternion, Vector3};

use crate::command::MotorValues;
use crate::id::StepId;
use crate::pose::Pose;
use crate::state::VehicleState;

/// Camera gimbal angles in degrees, as the host applies them to its
/// camera arm (roll added, pitch subtracted).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GimbalState {
    /// Roll (degrees).
    pub roll: f64,
    /// Pitch (degrees).
    pub pitch: f64,
}

impl GimbalState {
    /// Gimbal at the given roll and pitch.
    pub fn new(roll: f64, pitch: f64) -> Self {
        Self { roll, pitch }
    }
}

/// Immutable view of the simulation at one step boundary.
///
/// Every field comes from the same completed integration step. Shared
/// across threads as `Arc<KinematicsSnapshot>` and never mutated after
/// publication.
#[derive(Clone, Debug, PartialEq)]
pub struct KinematicsSnapshot {
    /// Step that produced this snapshot (`StepId(0)` after a reset).
    pub step: StepId,
    /// Simulated time since reset (s).
    pub sim_time: f64,
    /// World-frame position (m).
    pub position: Vector3<f64>,
    /// Body-to-world rotation.
    pub orientation: UnitQuaternion<f64>,
    /// Per-motor angular speed (rad/s). For animation and audio only.
    pub motor_speeds: MotorValues,
    /// The vehicle hit the ground after liftoff.
    pub crashed: bool,
    /// Gimbal state current when the step ran.
    pub gimbal: GimbalState,
    max_motor_rate: f64,
}

impl KinematicsSnapshot {
    /// Capture `state` as produced by `step`.
    pub fn capture(
        step: StepId,
        sim_time: f64,
        state: &VehicleState,
        gimbal: GimbalState,
        max_motor_rate: f64,
    ) -> Self {
        Self {
            step,
            sim_time,
            position: state.position,
            orientation: state.orientation,
            motor_speeds: state.motor_speeds.clone(),
            crashed: state.crashed,
            gimbal,
            max_motor_rate,
        }
    }

    /// Position and orientation.
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }

    /// Roll, pitch, yaw (radians).
    pub fn euler(&self) -> (f64, f64, f64) {
        self.orientation.euler_angles()
    }

    /// Motor speeds as fractions of the maximum rate.
    pub fn normalized_motor_speeds(&self) -> MotorValues {
        self.motor_speeds
            .iter()
            .map(|w| w / self.max_motor_rate)
            .collect()
    }

    /// Mean normalized motor speed, the value hosts feed to propeller
    /// sound pitch and volume.
    pub fn motor_mean(&self) -> f64 {
        if self.motor_speeds.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.motor_speeds.iter().sum();
        sum / (self.motor_speeds.len() as f64 * self.max_motor_rate)
    }
}
