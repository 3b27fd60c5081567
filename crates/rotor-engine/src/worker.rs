//! User-facing [`FlightWorker`] API and its lifecycle state machine.
//!
//! The worker runs a [`FlightEngine`] on a dedicated thread at a paced
//! fixed timestep. Consumers on any thread read published snapshots and
//! submit motor commands without ever waiting on a step.
//!
//! # Architecture
//!
//! ```text
//! Consumer Thread(s)                     Simulation Thread ("rotor-sim")
//!     |                                      |
//!     |--set_motors()----------------------->| take_latest(cmd_rx)
//!     |   [mailbox: bounded(1), latest wins] | engine.set_command()
//!     |--set_gimbal()--> [SharedGimbal] ---->| gimbal.get()
//!     |                                      | engine.step()
//!     |                                      | ring.publish(snapshot)
//!     |<--kinematics()------ ring.latest() --| counters.record_step()
//!     |                                      | park_timeout(budget - elapsed)
//!     |                                      |
//!     |--stop()--> shutdown_flag + unpark -->| exit loop, sim_stopped = true
//!     |<--join() returns FlightEngine--------|
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rotor_core::{
    CommandError, Dynamics, GimbalState, KinematicsSnapshot, MotorCommand, Pose, StepId,
    VehicleParameters,
};
use rotor_dynamics::{Environment, MultirotorDynamics};

use crate::config::{WorkerConfig, WorkerConfigError};
use crate::engine::FlightEngine;
use crate::ingress::{self, CommandSender};
use crate::metrics::{MetricsCounters, WorkerMetrics};
use crate::ring::SnapshotRing;
use crate::sim_thread::{SharedGimbal, SimThreadState};

// ── Error types ──────────────────────────────────────────────────

/// Errors from the worker lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// The simulation thread did not exit within the stop timeout.
    ///
    /// The worker stays in [`WorkerState::Stopping`]; `stop()` may be
    /// called again.
    TerminationTimeout {
        /// How long `stop()` waited.
        waited_ms: u64,
    },
    /// The simulation thread panicked. The model is lost.
    ThreadPanicked,
    /// The worker was never started.
    NotRunning,
}

impl std::fmt::Display for WorkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TerminationTimeout { waited_ms } => {
                write!(f, "simulation thread did not stop within {waited_ms} ms")
            }
            Self::ThreadPanicked => write!(f, "simulation thread panicked"),
            Self::NotRunning => write!(f, "worker is not running"),
        }
    }
}

impl std::error::Error for WorkerError {}

// ── StopReport ───────────────────────────────────────────────────

/// Report from a completed [`FlightWorker::stop()`].
#[derive(Clone, Debug, PartialEq)]
pub struct StopReport {
    /// Wall-clock time spent in the stop sequence.
    pub total_ms: u64,
    /// Last step the simulation thread executed.
    pub final_step: StepId,
    /// Simulated time at the last step, in seconds.
    pub sim_time: f64,
    /// Whether the vehicle was crashed when the thread exited.
    pub crashed: bool,
}

// ── WorkerState ──────────────────────────────────────────────────

/// Lifecycle state of a [`FlightWorker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Built but the simulation thread is not spawned yet.
    Created,
    /// The simulation thread is stepping.
    Running,
    /// A stop was requested and the thread has not been joined.
    Stopping,
    /// The thread is joined and the model released.
    Stopped,
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

// ── FlightWorker ─────────────────────────────────────────────────

/// Interval between checks while `stop()` waits for the thread to exit.
const STOP_POLL: Duration = Duration::from_millis(1);

/// Threaded flight simulation.
///
/// Owns one simulation thread for its whole life. The latest snapshot is
/// always available through [`kinematics()`](Self::kinematics), including
/// after [`stop()`](Self::stop).
pub struct FlightWorker {
    ring: Arc<SnapshotRing>,
    ingress: Option<CommandSender>,
    gimbal: Arc<SharedGimbal>,
    counters: Arc<MetricsCounters>,
    shutdown_flag: Arc<AtomicBool>,
    sim_stopped: Arc<AtomicBool>,
    sim_thread: Option<JoinHandle<FlightEngine>>,
    state: WorkerState,
    config: WorkerConfig,
    start: Pose,
    motor_count: usize,
    report: Option<StopReport>,
}

// Compile-time assertion: a worker can be shared across consumer threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<FlightWorker>();
    assert::<Arc<KinematicsSnapshot>>();
};

impl FlightWorker {
    /// Validate `config`, reset `model` to `start`, publish the step-0
    /// snapshot and spawn the simulation thread.
    ///
    /// On success the worker is [`Running`](WorkerState::Running) and
    /// [`kinematics()`](Self::kinematics) already returns the start pose.
    pub fn create(
        model: impl Dynamics + 'static,
        start: Pose,
        config: WorkerConfig,
    ) -> Result<Self, WorkerConfigError> {
        config.validate()?;
        let engine = FlightEngine::new(Box::new(model), start, config.dt)?;
        let motor_count = engine.motor_count();

        let gimbal = Arc::new(SharedGimbal::default());
        let ring = Arc::new(SnapshotRing::new(
            config.snapshot_history,
            engine.snapshot(gimbal.get()),
        ));

        let counters = Arc::new(MetricsCounters::new());
        let (ingress, cmd_rx) = ingress::mailbox(motor_count, Arc::clone(&counters));

        let mut worker = Self {
            ring,
            ingress: Some(ingress),
            gimbal,
            counters,
            shutdown_flag: Arc::new(AtomicBool::new(false)),
            sim_stopped: Arc::new(AtomicBool::new(false)),
            sim_thread: None,
            state: WorkerState::Created,
            config,
            start,
            motor_count,
            report: None,
        };

        let state = SimThreadState::new(
            engine,
            Arc::clone(&worker.ring),
            cmd_rx,
            Arc::clone(&worker.gimbal),
            Arc::clone(&worker.counters),
            Arc::clone(&worker.shutdown_flag),
            Arc::clone(&worker.sim_stopped),
            worker.config.step_budget(),
        );
        let handle = thread::Builder::new()
            .name("rotor-sim".into())
            .spawn(move || state.run())
            .map_err(|e| WorkerConfigError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;

        worker.sim_thread = Some(handle);
        worker.state = WorkerState::Running;
        log::info!(
            "flight worker started: {} motors, dt = {} s, realtime factor {}",
            motor_count,
            worker.config.dt,
            worker.config.realtime_factor
        );
        Ok(worker)
    }

    /// Build a [`MultirotorDynamics`] from `params` and `env`, then
    /// [`create()`](Self::create) a worker for it.
    pub fn create_with_parameters(
        params: VehicleParameters,
        env: Environment,
        start: Pose,
        config: WorkerConfig,
    ) -> Result<Self, WorkerConfigError> {
        let model = MultirotorDynamics::new(params, env)?;
        Self::create(model, start, config)
    }

    /// The most recently published snapshot.
    ///
    /// Never waits on the simulation thread beyond a lock held for one
    /// pointer swap.
    pub fn kinematics(&self) -> Arc<KinematicsSnapshot> {
        self.ring.latest()
    }

    /// The snapshot published for `step`, if it is still retained.
    pub fn snapshot_at(&self, step: StepId) -> Option<Arc<KinematicsSnapshot>> {
        self.ring.at(step)
    }

    /// Post throttle values for the next step, replacing any command no
    /// step has taken yet.
    ///
    /// Values of the wrong length or with non-finite entries are rejected
    /// here and the command in effect is kept.
    pub fn set_motors(&self, values: &[f64]) -> Result<(), CommandError> {
        self.sender()?.submit_values(values)
    }

    /// Post a pre-built command for the next step.
    pub fn submit(&self, command: MotorCommand) -> Result<(), CommandError> {
        self.sender()?.submit(command)
    }

    fn sender(&self) -> Result<&CommandSender, CommandError> {
        match self.state {
            WorkerState::Running => self.ingress.as_ref().ok_or(CommandError::Shutdown),
            _ => Err(CommandError::Shutdown),
        }
    }

    /// Set the gimbal stamped into subsequent snapshots.
    pub fn set_gimbal(&self, roll: f64, pitch: f64) {
        self.gimbal.set(GimbalState::new(roll, pitch));
    }

    /// Current gimbal setting.
    pub fn gimbal(&self) -> GimbalState {
        self.gimbal.get()
    }

    /// Lifecycle state.
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Copy of the simulation thread counters.
    pub fn metrics(&self) -> WorkerMetrics {
        self.counters.snapshot()
    }

    /// Number of motors commands must cover.
    pub fn motor_count(&self) -> usize {
        self.motor_count
    }

    /// Pose the worker was created at.
    pub fn start_pose(&self) -> &Pose {
        &self.start
    }

    /// Configuration the worker was created with.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Stop the simulation thread and release the model.
    ///
    /// 1. **Running → Stopping:** set the shutdown flag and unpark the
    ///    thread so a pacing park ends immediately.
    /// 2. Wait up to the configured stop timeout for the thread to exit.
    /// 3. **Stopping → Stopped:** close the command channel and join.
    ///
    /// A timeout leaves the worker in `Stopping` and returns
    /// [`WorkerError::TerminationTimeout`]; calling `stop()` again
    /// retries. Once stopped, further calls return the same report.
    pub fn stop(&mut self) -> Result<StopReport, WorkerError> {
        match self.state {
            WorkerState::Stopped => {
                return self.report.clone().ok_or(WorkerError::ThreadPanicked);
            }
            WorkerState::Created => return Err(WorkerError::NotRunning),
            WorkerState::Running | WorkerState::Stopping => {}
        }

        let start = Instant::now();
        if self.state == WorkerState::Running {
            log::debug!("stopping flight worker");
        }
        self.state = WorkerState::Stopping;
        self.shutdown_flag.store(true, Ordering::Release);

        let Some(handle) = self.sim_thread.take() else {
            self.state = WorkerState::Stopped;
            return Err(WorkerError::ThreadPanicked);
        };
        handle.thread().unpark();

        // A panicked thread never sets `sim_stopped`, so also watch the
        // handle itself.
        let deadline = start + self.config.stop_timeout();
        while !self.sim_stopped.load(Ordering::Acquire) && !handle.is_finished() {
            let now = Instant::now();
            if now >= deadline {
                let waited_ms = start.elapsed().as_millis() as u64;
                log::error!("simulation thread did not stop within {waited_ms} ms");
                self.sim_thread = Some(handle);
                return Err(WorkerError::TerminationTimeout { waited_ms });
            }
            thread::sleep(STOP_POLL.min(deadline - now));
        }

        self.ingress.take();
        self.state = WorkerState::Stopped;
        match handle.join() {
            Ok(engine) => {
                let report = StopReport {
                    total_ms: start.elapsed().as_millis() as u64,
                    final_step: engine.current_step(),
                    sim_time: engine.sim_time(),
                    crashed: engine.state().crashed,
                };
                log::info!(
                    "flight worker stopped at step {} after {} ms",
                    report.final_step,
                    report.total_ms
                );
                self.report = Some(report.clone());
                Ok(report)
            }
            Err(_) => {
                log::error!("simulation thread panicked");
                Err(WorkerError::ThreadPanicked)
            }
        }
    }
}

impl std::fmt::Debug for FlightWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightWorker")
            .field("state", &self.state)
            .field("motor_count", &self.motor_count)
            .field("latest_step", &self.ring.latest().step)
            .finish()
    }
}

impl Drop for FlightWorker {
    fn drop(&mut self) {
        if matches!(self.state, WorkerState::Running | WorkerState::Stopping) {
            if let Err(e) = self.stop() {
                log::warn!("flight worker dropped without a clean stop: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rotor_test_utils::{pose_at, CounterDynamics, PanickingDynamics, StallingDynamics};

    fn fast_config() -> WorkerConfig {
        WorkerConfig {
            dt: 0.01,
            realtime_factor: 100.0,
            snapshot_history: 16,
            ..WorkerConfig::default()
        }
    }

    fn wait_for(worker: &FlightWorker, pred: impl Fn(&KinematicsSnapshot) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !pred(&worker.kinematics()) {
            assert!(Instant::now() < deadline, "condition not reached within 5s");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn create_publishes_start_pose() {
        let config = WorkerConfig {
            realtime_factor: 0.001,
            ..fast_config()
        };
        let mut worker = FlightWorker::create(CounterDynamics::new(4), pose_at(7.0), config).unwrap();
        assert_eq!(worker.state(), WorkerState::Running);
        let snap = worker.snapshot_at(StepId(0)).unwrap();
        assert_eq!(snap.pose(), pose_at(7.0));
        assert_eq!(snap.sim_time, 0.0);
        worker.stop().unwrap();
    }

    #[test]
    fn invalid_config_rejected_before_spawn() {
        let config = WorkerConfig {
            snapshot_history: 1,
            ..WorkerConfig::default()
        };
        let err = FlightWorker::create(CounterDynamics::new(4), pose_at(0.0), config).unwrap_err();
        assert_eq!(err, WorkerConfigError::HistoryTooSmall { configured: 1 });

        let err =
            FlightWorker::create(CounterDynamics::new(0), pose_at(0.0), fast_config()).unwrap_err();
        assert_eq!(err, WorkerConfigError::Vehicle(rotor_core::ConfigError::NoMotors));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut worker =
            FlightWorker::create(CounterDynamics::new(4), pose_at(0.0), fast_config()).unwrap();
        wait_for(&worker, |s| s.step.0 >= 3);
        let first = worker.stop().unwrap();
        assert_eq!(worker.state(), WorkerState::Stopped);
        assert!(first.final_step.0 >= 3);
        assert_eq!(worker.stop().unwrap(), first);
        assert_eq!(worker.kinematics().step, first.final_step);
    }

    #[test]
    fn commands_rejected_after_stop() {
        let mut worker =
            FlightWorker::create(CounterDynamics::new(4), pose_at(0.0), fast_config()).unwrap();
        worker.stop().unwrap();
        assert_eq!(
            worker.set_motors(&[0.5; 4]),
            Err(CommandError::Shutdown)
        );
    }

    #[test]
    fn motors_and_gimbal_take_effect() {
        let mut worker =
            FlightWorker::create(CounterDynamics::new(4), pose_at(0.0), fast_config()).unwrap();
        worker.set_gimbal(12.0, -3.0);
        assert_eq!(worker.gimbal(), GimbalState::new(12.0, -3.0));
        worker.set_motors(&[0.2, 0.4, 0.6, 0.8]).unwrap();
        wait_for(&worker, |s| {
            s.motor_speeds.as_slice() == [0.2, 0.4, 0.6, 0.8]
                && s.gimbal == GimbalState::new(12.0, -3.0)
        });
        worker.stop().unwrap();
        assert!(worker.metrics().commands_applied >= 1);
    }

    #[test]
    fn stop_timeout_then_retry() {
        let config = WorkerConfig {
            stop_timeout_ms: 50,
            ..fast_config()
        };
        let model = StallingDynamics {
            motors: 4,
            delay: Duration::from_millis(500),
        };
        let mut worker = FlightWorker::create(model, pose_at(0.0), config).unwrap();
        // Let the thread enter its first stalled step.
        thread::sleep(Duration::from_millis(20));
        let err = worker.stop().unwrap_err();
        assert!(matches!(err, WorkerError::TerminationTimeout { .. }));
        assert_eq!(worker.state(), WorkerState::Stopping);

        thread::sleep(Duration::from_millis(700));
        worker.stop().unwrap();
        assert_eq!(worker.state(), WorkerState::Stopped);
    }

    #[test]
    fn panicked_thread_reported() {
        let model = PanickingDynamics {
            motors: 4,
            panic_at: 3.0,
        };
        let mut worker = FlightWorker::create(model, pose_at(0.0), fast_config()).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while worker.metrics().steps < 2 {
            assert!(Instant::now() < deadline);
            thread::sleep(Duration::from_millis(1));
        }
        thread::sleep(Duration::from_millis(50));
        assert_eq!(worker.stop(), Err(WorkerError::ThreadPanicked));
        assert_eq!(worker.state(), WorkerState::Stopped);
    }
}
