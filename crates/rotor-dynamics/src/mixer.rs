//! Motor speeds to body-frame force and torque.

use nalgebra::Vector3;
use rotor_core::{MotorValues, VehicleParameters};

/// Net thrust and torque produced by the rotors, in the body frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wrench {
    /// Total thrust along body +z (N).
    pub thrust: f64,
    /// Roll, pitch and yaw torque (N m).
    pub torque: Vector3<f64>,
    /// Net rotor angular momentum rate `sum(dir_i * w_i)` (rad/s), the
    /// source of gyroscopic coupling.
    pub rotor_spin: f64,
}

/// Mixing matrix derived from an airframe layout.
///
/// Motor i at arm azimuth `az_i` sits at `l * (cos az_i, sin az_i, 0)`
/// in the body frame, so its thrust `F_i` contributes `l sin(az_i) F_i`
/// of roll torque and `-l cos(az_i) F_i` of pitch torque. The reaction
/// torque of a counter-clockwise rotor yaws the body clockwise.
#[derive(Clone, Debug)]
pub struct Mixer {
    roll_arm: MotorValues,
    pitch_arm: MotorValues,
    directions: MotorValues,
    b: f64,
    d: f64,
}

impl Mixer {
    /// Build the mixer for `params`.
    pub fn new(params: &VehicleParameters) -> Self {
        let azimuths = params.frame.azimuths();
        Self {
            roll_arm: azimuths.iter().map(|az| params.l * az.sin()).collect(),
            pitch_arm: azimuths.iter().map(|az| -params.l * az.cos()).collect(),
            directions: params.frame.directions().iter().copied().collect(),
            b: params.b,
            d: params.d,
        }
    }

    /// Number of motors.
    pub fn motor_count(&self) -> usize {
        self.directions.len()
    }

    /// Wrench produced by rotors spinning at `speeds` (rad/s).
    pub fn wrench(&self, speeds: &[f64]) -> Wrench {
        let mut thrust = 0.0;
        let mut torque = Vector3::zeros();
        let mut rotor_spin = 0.0;
        for (i, &w) in speeds.iter().enumerate() {
            let w2 = w * w;
            let force = self.b * w2;
            thrust += force;
            torque.x += self.roll_arm[i] * force;
            torque.y += self.pitch_arm[i] * force;
            torque.z -= self.directions[i] * self.d * w2;
            rotor_spin += self.directions[i] * w;
        }
        Wrench {
            thrust,
            torque,
            rotor_spin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rotor_core::FrameSpec;

    fn params(frame: FrameSpec) -> VehicleParameters {
        VehicleParameters {
            frame,
            b: 1e-5,
            d: 1e-7,
            l: 0.5,
            jr: 1e-4,
            m: 2.0,
            ix: 0.1,
            iy: 0.1,
            iz: 0.2,
            maxrpm: 10_000.0,
            motor_tau: 0.05,
        }
    }

    #[test]
    fn equal_speeds_give_pure_thrust() {
        let mixer = Mixer::new(&params(FrameSpec::quad_x()));
        let wrench = mixer.wrench(&[500.0; 4]);
        assert_abs_diff_eq!(wrench.thrust, 4.0 * 1e-5 * 250_000.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wrench.torque.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wrench.torque.y, 0.0, epsilon = 1e-12);
        assert_eq!(wrench.torque.z, 0.0);
        assert_eq!(wrench.rotor_spin, 0.0);
    }

    #[test]
    fn right_side_motors_roll_left_side_down() {
        // quad_x motors 0 (front-right) and 3 (back-right) sit on -y.
        let mixer = Mixer::new(&params(FrameSpec::quad_x()));
        let wrench = mixer.wrench(&[600.0, 500.0, 500.0, 600.0]);
        assert!(wrench.torque.x < 0.0, "roll torque {}", wrench.torque.x);
        assert_abs_diff_eq!(wrench.torque.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn front_motors_pitch_nose_up() {
        // Front motors at +x: more thrust there rotates the nose up,
        // which is negative rotation about +y.
        let mixer = Mixer::new(&params(FrameSpec::quad_plus()));
        let wrench = mixer.wrench(&[500.0, 500.0, 600.0, 500.0]);
        assert!(wrench.torque.y < 0.0, "pitch torque {}", wrench.torque.y);
        assert_abs_diff_eq!(wrench.torque.x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn ccw_rotors_yaw_clockwise() {
        let mixer = Mixer::new(&params(FrameSpec::quad_x()));
        let wrench = mixer.wrench(&[600.0, 600.0, 500.0, 500.0]);
        assert!(wrench.torque.z < 0.0);
        assert_abs_diff_eq!(wrench.rotor_spin, 200.0, epsilon = 1e-12);
    }

    #[test]
    fn hex_equal_speeds_balanced() {
        let mixer = Mixer::new(&params(FrameSpec::hex_x()));
        assert_eq!(mixer.motor_count(), 6);
        let wrench = mixer.wrench(&[400.0; 6]);
        assert_abs_diff_eq!(wrench.torque.norm(), 0.0, epsilon = 1e-9);
    }
}
