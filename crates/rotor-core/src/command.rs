//! Normalized per-motor throttle commands.

use smallvec::SmallVec;

use crate::error::CommandError;

/// Per-motor value storage. Inline up to an octocopter, heap beyond.
pub type MotorValues = SmallVec<[f64; 8]>;

/// One normalized throttle value in `[0, 1]` per motor.
///
/// Construction rejects NaN and infinities and clamps finite values
/// into range. The length is checked against the configured vehicle
/// with [`check_shape()`](Self::check_shape) at submission time.
#[derive(Clone, Debug, PartialEq)]
pub struct MotorCommand {
    values: MotorValues,
}

impl MotorCommand {
    /// Build a command from raw throttle values.
    pub fn new(values: &[f64]) -> Result<Self, CommandError> {
        if let Some(motor) = values.iter().position(|v| !v.is_finite()) {
            return Err(CommandError::NonFinite { motor });
        }
        Ok(Self {
            values: values.iter().map(|v| v.clamp(0.0, 1.0)).collect(),
        })
    }

    /// All motors stopped.
    pub fn idle(motor_count: usize) -> Self {
        Self::uniform(motor_count, 0.0)
    }

    /// The same throttle on every motor, clamped into `[0, 1]`.
    /// NaN is treated as zero throttle.
    pub fn uniform(motor_count: usize, throttle: f64) -> Self {
        let throttle = if throttle.is_nan() {
            0.0
        } else {
            throttle.clamp(0.0, 1.0)
        };
        Self {
            values: smallvec::smallvec![throttle; motor_count],
        }
    }

    /// Reject the command unless it has exactly `motor_count` values.
    pub fn check_shape(&self, motor_count: usize) -> Result<(), CommandError> {
        if self.values.len() != motor_count {
            return Err(CommandError::Shape {
                expected: motor_count,
                got: self.values.len(),
            });
        }
        Ok(())
    }

    /// Throttle values in motor order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of motor values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the command carries no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_clamped() {
        let cmd = MotorCommand::new(&[-0.5, 0.25, 1.5]).unwrap();
        assert_eq!(cmd.values(), &[0.0, 0.25, 1.0]);
    }

    #[test]
    fn nan_rejected_with_index() {
        assert_eq!(
            MotorCommand::new(&[0.1, f64::NAN, 0.2]),
            Err(CommandError::NonFinite { motor: 1 })
        );
        assert_eq!(
            MotorCommand::new(&[f64::INFINITY]),
            Err(CommandError::NonFinite { motor: 0 })
        );
    }

    #[test]
    fn shape_check() {
        let cmd = MotorCommand::uniform(4, 0.5);
        assert_eq!(cmd.check_shape(4), Ok(()));
        assert_eq!(
            cmd.check_shape(6),
            Err(CommandError::Shape {
                expected: 6,
                got: 4
            })
        );
    }

    #[test]
    fn uniform_and_idle() {
        assert_eq!(MotorCommand::idle(3).values(), &[0.0, 0.0, 0.0]);
        assert_eq!(MotorCommand::uniform(2, 2.0).values(), &[1.0, 1.0]);
        assert_eq!(MotorCommand::uniform(2, f64::NAN).values(), &[0.0, 0.0]);
    }
}
