//! Worker configuration, validation, and error types.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use rotor_core::ConfigError;

// ── WorkerConfig ───────────────────────────────────────────────────

/// Execution settings for a [`FlightWorker`](crate::worker::FlightWorker)
/// and the engine it drives.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkerConfig {
    /// Simulated seconds per step. Default: 0.001 (1 kHz).
    pub dt: f64,
    /// Simulated seconds per wall-clock second. Default: 1.0.
    ///
    /// Values above 1 run faster than real time; each step is paced to
    /// `dt / realtime_factor` of wall time.
    pub realtime_factor: f64,
    /// Number of recent snapshots retained for
    /// [`snapshot_at()`](crate::worker::FlightWorker::snapshot_at).
    /// Default: 8. Minimum: 2.
    pub snapshot_history: usize,
    /// How long [`stop()`](crate::worker::FlightWorker::stop) waits for
    /// the simulation thread to exit. Default: 100 ms.
    pub stop_timeout_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            dt: 0.001,
            realtime_factor: 1.0,
            snapshot_history: 8,
            stop_timeout_ms: 100,
        }
    }
}

impl WorkerConfig {
    /// Check every field against its invariant.
    pub fn validate(&self) -> Result<(), WorkerConfigError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(WorkerConfigError::InvalidTimestep { value: self.dt });
        }
        // The pacing budget must also be representable as a Duration.
        let budget = self.dt / self.realtime_factor;
        if !self.realtime_factor.is_finite()
            || self.realtime_factor <= 0.0
            || Duration::try_from_secs_f64(budget).is_err()
        {
            return Err(WorkerConfigError::InvalidRealtimeFactor {
                value: self.realtime_factor,
            });
        }
        if self.snapshot_history < 2 {
            return Err(WorkerConfigError::HistoryTooSmall {
                configured: self.snapshot_history,
            });
        }
        if self.stop_timeout_ms == 0 {
            return Err(WorkerConfigError::StopTimeoutZero);
        }
        Ok(())
    }

    /// Wall-clock time budget for one step.
    ///
    /// Saturates for configurations that fail [`validate()`](Self::validate).
    pub fn step_budget(&self) -> Duration {
        Duration::try_from_secs_f64(self.dt / self.realtime_factor).unwrap_or(Duration::MAX)
    }

    /// Wall-clock bound on [`stop()`](crate::worker::FlightWorker::stop).
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

// ── WorkerConfigError ──────────────────────────────────────────────

/// Errors detected while constructing a flight worker or engine.
#[derive(Debug, PartialEq)]
pub enum WorkerConfigError {
    /// The vehicle model or start pose is invalid.
    Vehicle(ConfigError),
    /// `dt` is NaN, infinite, zero, or negative.
    InvalidTimestep {
        /// The invalid value.
        value: f64,
    },
    /// `realtime_factor` is NaN, infinite, zero, or negative.
    InvalidRealtimeFactor {
        /// The invalid value.
        value: f64,
    },
    /// Snapshot history is below the minimum of 2.
    HistoryTooSmall {
        /// The configured size that was too small.
        configured: usize,
    },
    /// Stop timeout is zero.
    StopTimeoutZero,
    /// The simulation thread could not be spawned.
    ThreadSpawnFailed {
        /// The OS error.
        reason: String,
    },
}

impl fmt::Display for WorkerConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vehicle(e) => write!(f, "vehicle: {e}"),
            Self::InvalidTimestep { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::InvalidRealtimeFactor { value } => {
                write!(f, "realtime_factor must be finite and positive, got {value}")
            }
            Self::HistoryTooSmall { configured } => {
                write!(f, "snapshot_history {configured} is below minimum of 2")
            }
            Self::StopTimeoutZero => write!(f, "stop_timeout_ms must be at least 1"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for WorkerConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Vehicle(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for WorkerConfigError {
    fn from(e: ConfigError) -> Self {
        Self::Vehicle(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = WorkerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert!((config.step_budget().as_secs_f64() - 0.001).abs() < 1e-9);
        assert_eq!(config.stop_timeout(), Duration::from_millis(100));
    }

    #[test]
    fn realtime_factor_scales_budget() {
        let config = WorkerConfig {
            dt: 0.01,
            realtime_factor: 10.0,
            ..WorkerConfig::default()
        };
        assert!((config.step_budget().as_secs_f64() - 0.001).abs() < 1e-9);
    }

    #[test]
    fn invalid_dt_rejected() {
        for dt in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            let config = WorkerConfig {
                dt,
                ..WorkerConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(WorkerConfigError::InvalidTimestep { .. })
            ));
        }
    }

    #[test]
    fn subnormal_realtime_factor_rejected() {
        let config = WorkerConfig {
            realtime_factor: f64::MIN_POSITIVE / 1e10,
            ..WorkerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WorkerConfigError::InvalidRealtimeFactor { .. })
        ));
    }

    #[test]
    fn small_history_and_zero_timeout_rejected() {
        let history = WorkerConfig {
            snapshot_history: 1,
            ..WorkerConfig::default()
        };
        assert_eq!(
            history.validate(),
            Err(WorkerConfigError::HistoryTooSmall { configured: 1 })
        );
        let timeout = WorkerConfig {
            stop_timeout_ms: 0,
            ..WorkerConfig::default()
        };
        assert_eq!(timeout.validate(), Err(WorkerConfigError::StopTimeoutZero));
    }

    #[test]
    fn vehicle_error_is_source() {
        let err = WorkerConfigError::from(ConfigError::NoMotors);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("vehicle: "));
    }
}
