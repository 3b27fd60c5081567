//! Continuous vehicle state and the result of one integration step.

use nalgebra::{UnitQuaternion, Vector3};

use crate::command::MotorValues;
use crate::pose::Pose;

/// Full rigid-body plus rotor state: 13 + N continuous values and two
/// discrete flags.
///
/// Owned and mutated only by the thread that runs the dynamics model;
/// other threads see it through published snapshots.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleState {
    /// World-frame position (m).
    pub position: Vector3<f64>,
    /// World-frame linear velocity (m/s).
    pub velocity: Vector3<f64>,
    /// Body-to-world rotation. Always unit.
    pub orientation: UnitQuaternion<f64>,
    /// Body-frame angular rates p, q, r (rad/s).
    pub angular_velocity: Vector3<f64>,
    /// Per-motor angular speed (rad/s).
    pub motor_speeds: MotorValues,
    /// The vehicle has been strictly above ground since the last reset.
    pub airborne: bool,
    /// Ground contact after liftoff; integration is frozen until reset.
    pub crashed: bool,
}

impl VehicleState {
    /// Motionless state at `pose` with all rotors stopped.
    pub fn at_rest(pose: &Pose, motor_count: usize) -> Self {
        Self {
            position: pose.position,
            velocity: Vector3::zeros(),
            orientation: pose.orientation,
            angular_velocity: Vector3::zeros(),
            motor_speeds: smallvec::smallvec![0.0; motor_count],
            airborne: false,
            crashed: false,
        }
    }

    /// Current pose.
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }

    /// Height above the world origin (z component of position).
    pub fn altitude(&self) -> f64 {
        self.position.z
    }

    /// Whether every continuous component is finite.
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.velocity.iter().all(|v| v.is_finite())
            && self.orientation.coords.iter().all(|v| v.is_finite())
            && self.angular_velocity.iter().all(|v| v.is_finite())
            && self.motor_speeds.iter().all(|v| v.is_finite())
    }
}

/// Outcome of one call to [`Dynamics::step`](crate::Dynamics::step).
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// State after the step.
    pub state: VehicleState,
    /// The vehicle is in the crashed state after this step.
    pub crashed: bool,
}
