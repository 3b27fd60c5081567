//! Airframe layout: motor count, spin directions, and arm azimuths.
//!
//! Body frame is forward-left-up: +x out the nose, +y out the left side,
//! +z up. A motor's azimuth is the angle of its arm in the body x-y plane,
//! measured from +x toward +y. Spin direction +1 is counter-clockwise
//! seen from above, -1 clockwise.

use crate::command::MotorValues;
use crate::error::ConfigError;

/// Numeric layout of a multirotor airframe.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSpec {
    directions: MotorValues,
    azimuths: MotorValues,
}

impl FrameSpec {
    /// Build a layout from per-motor spin directions and arm azimuths
    /// (degrees).
    pub fn new(directions: &[f64], azimuths_deg: &[f64]) -> Result<Self, ConfigError> {
        if directions.is_empty() {
            return Err(ConfigError::NoMotors);
        }
        if directions.len() != azimuths_deg.len() {
            return Err(ConfigError::FrameMismatch {
                directions: directions.len(),
                azimuths: azimuths_deg.len(),
            });
        }
        for (motor, &value) in directions.iter().enumerate() {
            if value != 1.0 && value != -1.0 {
                return Err(ConfigError::InvalidDirection { motor, value });
            }
        }
        if let Some(&value) = azimuths_deg.iter().find(|a| !a.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "motor azimuth",
                value,
            });
        }
        Ok(Self {
            directions: directions.iter().copied().collect(),
            azimuths: azimuths_deg.iter().map(|a| a.to_radians()).collect(),
        })
    }

    /// Quadcopter in "X" configuration, ArduPilot motor ordering:
    /// front-right CCW, back-left CCW, front-left CW, back-right CW.
    pub fn quad_x() -> Self {
        Self::from_table(&[1.0, 1.0, -1.0, -1.0], &[-45.0, 135.0, 45.0, -135.0])
    }

    /// Quadcopter in "+" configuration, ArduPilot motor ordering:
    /// right CCW, left CCW, front CW, back CW.
    pub fn quad_plus() -> Self {
        Self::from_table(&[1.0, 1.0, -1.0, -1.0], &[-90.0, 90.0, 0.0, 180.0])
    }

    /// Hexacopter in "X" configuration, ArduPilot motor ordering.
    pub fn hex_x() -> Self {
        Self::from_table(
            &[-1.0, 1.0, -1.0, 1.0, 1.0, -1.0],
            &[-90.0, 90.0, 30.0, -150.0, -30.0, 150.0],
        )
    }

    fn from_table(directions: &[f64], azimuths_deg: &[f64]) -> Self {
        Self {
            directions: directions.iter().copied().collect(),
            azimuths: azimuths_deg.iter().map(|a| a.to_radians()).collect(),
        }
    }

    /// Number of motors.
    pub fn motor_count(&self) -> usize {
        self.directions.len()
    }

    /// Spin direction of each motor (+1 CCW, -1 CW).
    pub fn directions(&self) -> &[f64] {
        &self.directions
    }

    /// Arm azimuth of each motor, in radians.
    pub fn azimuths(&self) -> &[f64] {
        &self.azimuths
    }

    /// Name of the propeller part for motor `index` (`Prop1`, `Prop2`, ...).
    ///
    /// Hosts use it to locate the rotor meshes they animate from
    /// published motor speeds.
    pub fn part_name(&self, index: usize) -> String {
        format!("Prop{}", index + 1)
    }
}
