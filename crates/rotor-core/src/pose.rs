//! Position plus orientation in the world frame.

use nalgebra::{UnitQuaternion, Vector3};

/// World-frame pose of the vehicle body.
///
/// World frame is z-up. `orientation` rotates body-frame vectors into
/// the world frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Position in world units (m).
    pub position: Vector3<f64>,
    /// Body-to-world rotation.
    pub orientation: UnitQuaternion<f64>,
}

impl Pose {
    /// Pose from a position and an orientation.
    pub fn new(position: Vector3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Level pose at `position`.
    pub fn level(position: Vector3<f64>) -> Self {
        Self::new(position, UnitQuaternion::identity())
    }

    /// Pose from a position and roll/pitch/yaw Euler angles (radians).
    pub fn from_euler(position: Vector3<f64>, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self::new(position, UnitQuaternion::from_euler_angles(roll, pitch, yaw))
    }

    /// Roll, pitch, yaw (radians) of the orientation.
    pub fn euler(&self) -> (f64, f64, f64) {
        self.orientation.euler_angles()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::level(Vector3::zeros())
    }
}
