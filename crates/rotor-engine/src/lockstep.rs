//! Lockstep (synchronous) flight simulation.
//!
//! [`LockstepFlight`] runs the same [`FlightEngine`] as the threaded
//! worker, one step per call, on the caller's thread. Hosts that own
//! their clock, tests and benchmarks use it to get exactly reproducible
//! trajectories.

use rotor_core::{
    CommandError, ConfigError, Dynamics, GimbalState, KinematicsSnapshot, MotorCommand, Pose,
    StepId, VehicleState,
};

use crate::engine::FlightEngine;

/// Single-threaded flight simulation stepped on demand.
///
/// # Example
///
/// ```ignore
/// let mut flight = LockstepFlight::new(model, start, 0.01)?;
/// let hover = MotorCommand::uniform(4, 0.83);
/// for _ in 0..1000 {
///     let snap = flight.step(&hover)?;
///     if snap.crashed {
///         flight.reset();
///     }
/// }
/// ```
pub struct LockstepFlight {
    engine: FlightEngine,
    gimbal: GimbalState,
}

impl LockstepFlight {
    /// Build a simulation of `model` starting at `start`.
    pub fn new(model: impl Dynamics + 'static, start: Pose, dt: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: FlightEngine::new(Box::new(model), start, dt)?,
            gimbal: GimbalState::default(),
        })
    }

    /// Apply `command` and execute one step.
    ///
    /// A rejected command leaves the simulation untouched: no step runs.
    pub fn step(&mut self, command: &MotorCommand) -> Result<KinematicsSnapshot, CommandError> {
        self.engine.set_command(command.clone())?;
        self.engine.step();
        Ok(self.snapshot())
    }

    /// Apply `command` and execute `n` steps, returning the final snapshot.
    pub fn step_n(
        &mut self,
        command: &MotorCommand,
        n: u64,
    ) -> Result<KinematicsSnapshot, CommandError> {
        self.engine.set_command(command.clone())?;
        for _ in 0..n {
            self.engine.step();
        }
        Ok(self.snapshot())
    }

    /// Snapshot of the current state.
    pub fn snapshot(&self) -> KinematicsSnapshot {
        self.engine.snapshot(self.gimbal)
    }

    /// Return to the start pose at step 0 and return its snapshot.
    pub fn reset(&mut self) -> KinematicsSnapshot {
        self.engine.reset();
        self.snapshot()
    }

    /// Set the gimbal stamped into subsequent snapshots.
    pub fn set_gimbal(&mut self, roll: f64, pitch: f64) {
        self.gimbal = GimbalState::new(roll, pitch);
    }

    /// Full vehicle state.
    pub fn state(&self) -> &VehicleState {
        self.engine.state()
    }

    /// Last executed step.
    pub fn current_step(&self) -> StepId {
        self.engine.current_step()
    }

    /// Number of motors.
    pub fn motor_count(&self) -> usize {
        self.engine.motor_count()
    }
}

impl std::fmt::Debug for LockstepFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockstepFlight")
            .field("engine", &self.engine)
            .field("gimbal", &self.gimbal)
            .finish()
    }
}
