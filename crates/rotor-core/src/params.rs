//! Physical constants of a vehicle, immutable for a simulation run.

use std::f64::consts::PI;

use crate::error::ConfigError;
use crate::frame::FrameSpec;

/// Physical parameter set for one airframe.
///
/// Units are SI: kilograms, metres, seconds, radians. `maxrpm` is the
/// only exception, kept in revolutions per minute as airframe tables
/// quote it; [`max_motor_rate()`](Self::max_motor_rate) converts.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleParameters {
    /// Motor layout.
    pub frame: FrameSpec,
    /// Thrust coefficient `b`: thrust = b * w^2 (N s^2).
    pub b: f64,
    /// Drag coefficient `d`: reaction torque = d * w^2 (N m s^2).
    pub d: f64,
    /// Arm length `l` (m).
    pub l: f64,
    /// Rotor moment of inertia `Jr` (kg m^2).
    pub jr: f64,
    /// Body mass `m` (kg).
    pub m: f64,
    /// Moment of inertia about body x (kg m^2).
    pub ix: f64,
    /// Moment of inertia about body y (kg m^2).
    pub iy: f64,
    /// Moment of inertia about body z (kg m^2).
    pub iz: f64,
    /// Maximum motor speed (revolutions per minute).
    pub maxrpm: f64,
    /// First-order motor lag time constant (s).
    pub motor_tau: f64,
}

impl VehicleParameters {
    /// Check every invariant: at least one motor, consistent frame
    /// tables, and all constants finite and strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame.motor_count() == 0 {
            return Err(ConfigError::NoMotors);
        }
        let constants = [
            ("b", self.b),
            ("d", self.d),
            ("l", self.l),
            ("jr", self.jr),
            ("m", self.m),
            ("ix", self.ix),
            ("iy", self.iy),
            ("iz", self.iz),
            ("maxrpm", self.maxrpm),
            ("motor_tau", self.motor_tau),
        ];
        for (name, value) in constants {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// Number of motors.
    pub fn motor_count(&self) -> usize {
        self.frame.motor_count()
    }

    /// Maximum motor angular rate in rad/s.
    pub fn max_motor_rate(&self) -> f64 {
        self.maxrpm * PI / 30.0
    }

    /// Motor angular rate (rad/s) at which total thrust equals weight
    /// under gravity `g`.
    pub fn hover_rate(&self, g: f64) -> f64 {
        (self.m * g / (self.motor_count() as f64 * self.b)).sqrt()
    }

    /// Normalized throttle that holds a level hover, or `None` if the
    /// vehicle cannot lift its own weight at full throttle.
    pub fn hover_throttle(&self, g: f64) -> Option<f64> {
        let throttle = self.hover_rate(g) / self.max_motor_rate();
        (throttle <= 1.0).then_some(throttle)
    }
}
