//! World constants shared by every vehicle in a simulation.

use rotor_core::ConfigError;

/// Standard gravity (m/s^2).
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Gravity and ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    /// Gravitational acceleration magnitude, pointing down -z (m/s^2).
    pub gravity: f64,
    /// Altitude of the flat ground plane (m).
    pub ground_level: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            gravity: STANDARD_GRAVITY,
            ground_level: 0.0,
        }
    }
}

impl Environment {
    /// Check that gravity is finite and positive and the ground level
    /// is finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err(ConfigError::InvalidEnvironment {
                reason: format!("gravity must be finite and positive, got {}", self.gravity),
            });
        }
        if !self.ground_level.is_finite() {
            return Err(ConfigError::InvalidEnvironment {
                reason: format!("ground level must be finite, got {}", self.ground_level),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Environment::default().validate(), Ok(()));
    }

    #[test]
    fn zero_gravity_rejected() {
        let env = Environment {
            gravity: 0.0,
            ..Environment::default()
        };
        assert!(matches!(
            env.validate(),
            Err(ConfigError::InvalidEnvironment { .. })
        ));
    }

    #[test]
    fn nan_ground_rejected() {
        let env = Environment {
            ground_level: f64::NAN,
            ..Environment::default()
        };
        assert!(env.validate().is_err());
    }
}
