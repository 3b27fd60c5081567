//! Single-threaded fixed-timestep step loop.
//!
//! [`FlightEngine`] owns a dynamics model, the vehicle state and the
//! command in effect. It has no notion of wall-clock time: callers
//! decide when to step. [`LockstepFlight`](crate::lockstep::LockstepFlight)
//! steps it on demand and the simulation thread behind
//! [`FlightWorker`](crate::worker::FlightWorker) steps it at a paced rate.

use rotor_core::{
    CommandError, ConfigError, Dynamics, GimbalState, KinematicsSnapshot, MotorCommand, Pose,
    StepId, VehicleState,
};

/// Result of one [`FlightEngine::step()`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// Step that was just executed.
    pub step: StepId,
    /// The vehicle is crashed after this step.
    pub crashed: bool,
    /// This step is the one on which the vehicle crashed.
    pub newly_crashed: bool,
}

/// Fixed-timestep driver around a boxed [`Dynamics`] model.
pub struct FlightEngine {
    model: Box<dyn Dynamics>,
    dt: f64,
    start: Pose,
    state: VehicleState,
    command: MotorCommand,
    step: StepId,
}

impl FlightEngine {
    /// Build an engine and reset it to `start`.
    ///
    /// Fails if `dt` is not finite and positive, if the model has no
    /// motors, or if the start pose has non-finite components.
    pub fn new(model: Box<dyn Dynamics>, start: Pose, dt: f64) -> Result<Self, ConfigError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "dt",
                value: dt,
            });
        }
        if model.motor_count() == 0 {
            return Err(ConfigError::NoMotors);
        }
        if let Some(&value) = start.position.iter().find(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "start position",
                value,
            });
        }
        if let Some(&value) = start.orientation.coords.iter().find(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "start orientation",
                value,
            });
        }
        let state = model.reset(&start);
        let command = MotorCommand::idle(model.motor_count());
        Ok(Self {
            model,
            dt,
            start,
            state,
            command,
            step: StepId::default(),
        })
    }

    /// Replace the command in effect from the next step on.
    ///
    /// A command of the wrong length is rejected and the previous
    /// command stays in effect.
    pub fn set_command(&mut self, command: MotorCommand) -> Result<(), CommandError> {
        command.check_shape(self.model.motor_count())?;
        self.command = command;
        Ok(())
    }

    /// Advance one timestep under the current command.
    pub fn step(&mut self) -> StepOutcome {
        let was_crashed = self.state.crashed;
        let transition = self.model.step(&self.state, &self.command, self.dt);
        self.state = transition.state;
        self.state.crashed = transition.crashed;
        self.step = self.step.next();
        StepOutcome {
            step: self.step,
            crashed: transition.crashed,
            newly_crashed: transition.crashed && !was_crashed,
        }
    }

    /// Return to the start pose at step 0 with an idle command.
    pub fn reset(&mut self) {
        self.state = self.model.reset(&self.start);
        self.command = MotorCommand::idle(self.model.motor_count());
        self.step = StepId::default();
    }

    /// Capture the current state, stamped with `gimbal`.
    pub fn snapshot(&self, gimbal: GimbalState) -> KinematicsSnapshot {
        KinematicsSnapshot::capture(
            self.step,
            self.sim_time(),
            &self.state,
            gimbal,
            self.model.max_motor_rate(),
        )
    }

    /// Current vehicle state.
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// Command in effect.
    pub fn command(&self) -> &MotorCommand {
        &self.command
    }

    /// Last executed step (0 after construction or reset).
    pub fn current_step(&self) -> StepId {
        self.step
    }

    /// Simulated time since reset, `step * dt`.
    pub fn sim_time(&self) -> f64 {
        self.step.0 as f64 * self.dt
    }

    /// Timestep in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Pose the engine resets to.
    pub fn start_pose(&self) -> &Pose {
        &self.start
    }

    /// Motor count of the model.
    pub fn motor_count(&self) -> usize {
        self.model.motor_count()
    }
}

impl std::fmt::Debug for FlightEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightEngine")
            .field("step", &self.step)
            .field("dt", &self.dt)
            .field("motors", &self.model.motor_count())
            .field("crashed", &self.state.crashed)
            .finish()
    }
}

// Compile-time assertion: the engine moves onto the simulation thread.
const _: fn() = || {
    fn assert<T: Send>() {}
    assert::<FlightEngine>();
};
