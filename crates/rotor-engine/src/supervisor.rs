//! Crash-restart supervision of a [`FlightWorker`].
//!
//! [`SimulationSupervisor`] keeps a model factory and the start pose it
//! was given. When [`poll()`](SimulationSupervisor::poll) observes a
//! crashed snapshot, the running worker is stopped and a fresh one is
//! built from a new model at the recorded start pose. A crash is always
//! a full reset, never a resume.

use std::sync::Arc;

use rotor_core::{CommandError, ConfigError, Dynamics, GimbalState, KinematicsSnapshot, Pose};

use crate::config::{WorkerConfig, WorkerConfigError};
use crate::worker::{FlightWorker, StopReport, WorkerError};

// ── SupervisorError ────────────────────────────────────────────────

/// Errors from [`SimulationSupervisor`] operations.
#[derive(Debug, PartialEq)]
pub enum SupervisorError {
    /// No worker has been started.
    NotStarted,
    /// Building the model or worker failed.
    Config(WorkerConfigError),
    /// Stopping the previous worker failed.
    Worker(WorkerError),
}

impl std::fmt::Display for SupervisorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "supervisor has not been started"),
            Self::Config(e) => write!(f, "worker config: {e}"),
            Self::Worker(e) => write!(f, "worker: {e}"),
        }
    }
}

impl std::error::Error for SupervisorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotStarted => None,
            Self::Config(e) => Some(e),
            Self::Worker(e) => Some(e),
        }
    }
}

impl From<WorkerConfigError> for SupervisorError {
    fn from(e: WorkerConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ConfigError> for SupervisorError {
    fn from(e: ConfigError) -> Self {
        Self::Config(WorkerConfigError::Vehicle(e))
    }
}

impl From<WorkerError> for SupervisorError {
    fn from(e: WorkerError) -> Self {
        Self::Worker(e)
    }
}

// ── SimulationSupervisor ───────────────────────────────────────────

/// Owns a model factory, a start pose and at most one running worker.
///
/// # Example
///
/// ```ignore
/// let env = Environment::default();
/// let mut sup = SimulationSupervisor::new(
///     move || VehicleKind::BigQuad.create(env),
///     Pose::level(Vector3::new(0.0, 0.0, 10.0)),
///     WorkerConfig::default(),
/// );
/// sup.start()?;
/// loop {
///     let snap = sup.poll()?;
///     render(&snap);
/// }
/// ```
pub struct SimulationSupervisor<F> {
    factory: F,
    start: Pose,
    config: WorkerConfig,
    gimbal: GimbalState,
    worker: Option<FlightWorker>,
    restarts: u64,
}

impl<F, D> SimulationSupervisor<F>
where
    F: FnMut() -> Result<D, ConfigError>,
    D: Dynamics + 'static,
{
    /// Record the factory, start pose and worker configuration. No
    /// model is built until [`start()`](Self::start).
    pub fn new(factory: F, start: Pose, config: WorkerConfig) -> Self {
        Self {
            factory,
            start,
            config,
            gimbal: GimbalState::default(),
            worker: None,
            restarts: 0,
        }
    }

    /// Build a model and start a worker at the recorded start pose.
    ///
    /// Does nothing if a worker is already running.
    pub fn start(&mut self) -> Result<(), SupervisorError> {
        if self.worker.is_some() {
            return Ok(());
        }
        self.spawn_worker()
    }

    fn spawn_worker(&mut self) -> Result<(), SupervisorError> {
        let model = (self.factory)()?;
        let worker = FlightWorker::create(model, self.start, self.config.clone())?;
        worker.set_gimbal(self.gimbal.roll, self.gimbal.pitch);
        self.worker = Some(worker);
        Ok(())
    }

    /// The latest snapshot of the running worker.
    ///
    /// If that snapshot is crashed it is still returned, and the worker
    /// is replaced by a fresh one at the start pose before this call
    /// returns.
    pub fn poll(&mut self) -> Result<Arc<KinematicsSnapshot>, SupervisorError> {
        let worker = self.worker.as_ref().ok_or(SupervisorError::NotStarted)?;
        let snapshot = worker.kinematics();
        if snapshot.crashed {
            self.restart(&snapshot)?;
        }
        Ok(snapshot)
    }

    fn restart(&mut self, crashed: &KinematicsSnapshot) -> Result<(), SupervisorError> {
        if let Some(worker) = self.worker.as_mut() {
            worker.stop()?;
        }
        self.worker = None;
        self.spawn_worker()?;
        self.restarts += 1;
        log::info!(
            "vehicle crashed at step {} (t = {:.3} s), restart #{} from start pose",
            crashed.step,
            crashed.sim_time,
            self.restarts
        );
        Ok(())
    }

    /// Post throttle values to the running worker.
    pub fn set_motors(&self, values: &[f64]) -> Result<(), CommandError> {
        self.worker
            .as_ref()
            .ok_or(CommandError::Shutdown)?
            .set_motors(values)
    }

    /// Set the gimbal, kept across restarts.
    pub fn set_gimbal(&mut self, roll: f64, pitch: f64) {
        self.gimbal = GimbalState::new(roll, pitch);
        if let Some(worker) = &self.worker {
            worker.set_gimbal(roll, pitch);
        }
    }

    /// Current gimbal setting.
    pub fn gimbal(&self) -> GimbalState {
        self.gimbal
    }

    /// Stop the running worker.
    pub fn stop(&mut self) -> Result<StopReport, SupervisorError> {
        let worker = self.worker.as_mut().ok_or(SupervisorError::NotStarted)?;
        let report = worker.stop()?;
        self.worker = None;
        Ok(report)
    }

    /// Number of crash restarts so far.
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// The running worker, if any.
    pub fn worker(&self) -> Option<&FlightWorker> {
        self.worker.as_ref()
    }

    /// Pose every worker starts from.
    pub fn start_pose(&self) -> &Pose {
        &self.start
    }
}

impl<F> std::fmt::Debug for SimulationSupervisor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationSupervisor")
            .field("worker", &self.worker)
            .field("restarts", &self.restarts)
            .field("gimbal", &self.gimbal)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, Instant};

    use rotor_core::StepId;
    use rotor_test_utils::{pose_at, CounterDynamics, SinkingDynamics};

    fn config() -> WorkerConfig {
        WorkerConfig {
            dt: 0.01,
            realtime_factor: 100.0,
            ..WorkerConfig::default()
        }
    }

    #[test]
    fn poll_before_start_fails() {
        let mut sup = SimulationSupervisor::new(
            || Ok::<_, ConfigError>(CounterDynamics::new(4)),
            pose_at(0.0),
            config(),
        );
        assert!(matches!(sup.poll(), Err(SupervisorError::NotStarted)));
        assert_eq!(sup.set_motors(&[0.0; 4]), Err(CommandError::Shutdown));
    }

    #[test]
    fn factory_error_propagates() {
        let mut sup = SimulationSupervisor::new(
            || -> Result<CounterDynamics, ConfigError> {
                Err(ConfigError::UnknownVehicle {
                    name: "zeppelin".into(),
                })
            },
            pose_at(0.0),
            config(),
        );
        assert!(matches!(
            sup.start(),
            Err(SupervisorError::Config(WorkerConfigError::Vehicle(
                ConfigError::UnknownVehicle { .. }
            )))
        ));
        assert!(sup.worker().is_none());
    }

    #[test]
    fn crash_restarts_from_start_pose() {
        let config = WorkerConfig {
            snapshot_history: 4096,
            ..config()
        };
        let mut sup = SimulationSupervisor::new(
            || Ok::<_, ConfigError>(SinkingDynamics { motors: 4 }),
            pose_at(5.0),
            config,
        );
        sup.start().unwrap();
        sup.set_gimbal(20.0, 10.0);

        let deadline = Instant::now() + Duration::from_secs(5);
        let crashed = loop {
            let snap = sup.poll().unwrap();
            if snap.crashed {
                break snap;
            }
            assert!(Instant::now() < deadline, "no crash within 5s");
            thread::sleep(Duration::from_millis(1));
        };
        assert_eq!(crashed.position.z, 0.0);
        assert_eq!(sup.restarts(), 1);

        let worker = sup.worker().unwrap();
        let fresh = worker.snapshot_at(StepId(0)).unwrap();
        assert_eq!(fresh.pose(), pose_at(5.0));
        assert!(!fresh.crashed);
        assert_eq!(worker.gimbal(), GimbalState::new(20.0, 10.0));
        sup.stop().unwrap();
        assert!(sup.worker().is_none());
    }
}
