//! Rigid-body equations of motion and the semi-implicit Euler step.

use nalgebra::{UnitQuaternion, Vector3};
use rotor_core::{MotorValues, VehicleState};

use crate::mixer::Wrench;

/// Mass and inertia of the airframe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassProperties {
    /// Body mass (kg).
    pub mass: f64,
    /// Principal moments of inertia (Ix, Iy, Iz) (kg m^2).
    pub inertia: Vector3<f64>,
    /// Rotor moment of inertia (kg m^2).
    pub rotor_inertia: f64,
}

/// World-frame linear acceleration: rotated body thrust plus gravity.
pub fn linear_acceleration(
    orientation: &UnitQuaternion<f64>,
    thrust: f64,
    mass: f64,
    gravity: f64,
) -> Vector3<f64> {
    let force = orientation * Vector3::new(0.0, 0.0, thrust) - Vector3::new(0.0, 0.0, mass * gravity);
    force / mass
}

/// Body angular acceleration from Euler's equations with rotor
/// gyroscopic coupling.
pub fn angular_acceleration(
    omega: &Vector3<f64>,
    body: &MassProperties,
    wrench: &Wrench,
) -> Vector3<f64> {
    let (p, q, r) = (omega.x, omega.y, omega.z);
    let (ix, iy, iz) = (body.inertia.x, body.inertia.y, body.inertia.z);
    let gyro = body.rotor_inertia * wrench.rotor_spin;
    Vector3::new(
        (q * r * (iy - iz) - gyro * q + wrench.torque.x) / ix,
        (p * r * (iz - ix) + gyro * p + wrench.torque.y) / iy,
        (p * q * (ix - iy) + wrench.torque.z) / iz,
    )
}

/// One semi-implicit Euler step.
///
/// Velocities advance first and the updated velocities drive position
/// and orientation. Orientation moves along the exponential map of the
/// body rate and is renormalized. Flags are copied from `state`; ground
/// contact is the caller's concern.
pub fn semi_implicit_euler(
    state: &VehicleState,
    motor_speeds: MotorValues,
    linear_accel: &Vector3<f64>,
    angular_accel: &Vector3<f64>,
    dt: f64,
) -> VehicleState {
    let velocity = state.velocity + linear_accel * dt;
    let position = state.position + velocity * dt;
    let angular_velocity = state.angular_velocity + angular_accel * dt;
    let mut orientation =
        state.orientation * UnitQuaternion::from_scaled_axis(angular_velocity * dt);
    orientation.renormalize();
    VehicleState {
        position,
        velocity,
        orientation,
        angular_velocity,
        motor_speeds,
        airborne: state.airborne,
        crashed: state.crashed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rotor_core::Pose;

    fn body() -> MassProperties {
        MassProperties {
            mass: 2.0,
            inertia: Vector3::new(0.1, 0.1, 0.2),
            rotor_inertia: 1e-4,
        }
    }

    #[test]
    fn level_thrust_against_gravity() {
        let a = linear_acceleration(&UnitQuaternion::identity(), 2.0 * 9.81, 2.0, 9.81);
        assert_relative_eq!(a.norm(), 0.0, epsilon = 1e-12);
        let a = linear_acceleration(&UnitQuaternion::identity(), 0.0, 2.0, 9.81);
        assert_relative_eq!(a.z, -9.81);
    }

    #[test]
    fn tilted_thrust_accelerates_sideways() {
        // Positive roll tips body +z toward world -y.
        let q = UnitQuaternion::from_euler_angles(0.2, 0.0, 0.0);
        let a = linear_acceleration(&q, 20.0, 2.0, 9.81);
        assert!(a.y < 0.0);
        assert_relative_eq!(a.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn torque_free_symmetric_body_keeps_rates() {
        let wrench = Wrench {
            thrust: 0.0,
            torque: Vector3::zeros(),
            rotor_spin: 0.0,
        };
        let mut b = body();
        b.inertia = Vector3::new(0.1, 0.1, 0.1);
        let alpha = angular_acceleration(&Vector3::new(1.0, 2.0, 3.0), &b, &wrench);
        assert_relative_eq!(alpha.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rotor_spin_couples_pitch_into_roll() {
        let wrench = Wrench {
            thrust: 0.0,
            torque: Vector3::zeros(),
            rotor_spin: 100.0,
        };
        let alpha = angular_acceleration(&Vector3::new(0.0, 1.0, 0.0), &body(), &wrench);
        assert_relative_eq!(alpha.x, -1e-4 * 100.0 / 0.1, epsilon = 1e-12);
        assert_eq!(alpha.y, 0.0);
    }

    #[test]
    fn step_uses_updated_velocity() {
        let state = VehicleState::at_rest(&Pose::level(Vector3::new(0.0, 0.0, 10.0)), 4);
        let next = semi_implicit_euler(
            &state,
            state.motor_speeds.clone(),
            &Vector3::new(0.0, 0.0, -10.0),
            &Vector3::zeros(),
            0.1,
        );
        assert_relative_eq!(next.velocity.z, -1.0);
        assert_relative_eq!(next.position.z, 9.9);
    }

    #[test]
    fn orientation_follows_body_rate() {
        let state = VehicleState::at_rest(&Pose::default(), 4);
        let next = semi_implicit_euler(
            &state,
            state.motor_speeds.clone(),
            &Vector3::zeros(),
            &Vector3::new(0.0, 0.0, 1.0),
            0.5,
        );
        // omega = 0.5 rad/s after the step, rotated for 0.5 s.
        let (_, _, yaw) = next.orientation.euler_angles();
        assert_relative_eq!(yaw, 0.25, epsilon = 1e-12);
        assert_relative_eq!(next.orientation.norm(), 1.0, epsilon = 1e-15);
    }
}
