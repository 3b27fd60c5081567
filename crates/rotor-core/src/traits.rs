//! The dynamics model contract.

use crate::command::MotorCommand;
use crate::pose::Pose;
use crate::state::{Transition, VehicleState};

/// A vehicle model that advances a [`VehicleState`] by one fixed timestep.
///
/// Implementations are pure functions of their inputs: the same state,
/// command and `dt` must produce the same transition on every call. All
/// mutable state lives in the [`VehicleState`] the caller owns, so one
/// model instance can be moved onto the simulation thread and reused
/// across resets.
///
/// `Send` so the model can move onto the simulation thread.
pub trait Dynamics: Send {
    /// Number of motors the model expects a command for.
    fn motor_count(&self) -> usize;

    /// Maximum motor angular rate (rad/s), used to normalize published
    /// motor speeds.
    fn max_motor_rate(&self) -> f64;

    /// Initial state at `pose` with zero velocities and stopped rotors.
    fn reset(&self, pose: &Pose) -> VehicleState;

    /// Advance `state` by `dt` seconds under `command`.
    ///
    /// A crashed input state is returned unchanged, as is any state
    /// stepped with a command whose length is not
    /// [`motor_count()`](Self::motor_count).
    fn step(&self, state: &VehicleState, command: &MotorCommand, dt: f64) -> Transition;
}

impl<D: Dynamics + ?Sized> Dynamics for Box<D> {
    fn motor_count(&self) -> usize {
        (**self).motor_count()
    }

    fn max_motor_rate(&self) -> f64 {
        (**self).max_motor_rate()
    }

    fn reset(&self, pose: &Pose) -> VehicleState {
        (**self).reset(pose)
    }

    fn step(&self, state: &VehicleState, command: &MotorCommand, dt: f64) -> Transition {
        (**self).step(state, command, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    struct Inert;

    impl Dynamics for Inert {
        fn motor_count(&self) -> usize {
            2
        }

        fn max_motor_rate(&self) -> f64 {
            1.0
        }

        fn reset(&self, pose: &Pose) -> VehicleState {
            VehicleState::at_rest(pose, 2)
        }

        fn step(&self, state: &VehicleState, _command: &MotorCommand, _dt: f64) -> Transition {
            Transition {
                state: state.clone(),
                crashed: state.crashed,
            }
        }
    }

    #[test]
    fn boxed_model_forwards() {
        let model: Box<dyn Dynamics> = Box::new(Inert);
        let start = Pose::level(Vector3::new(0.0, 0.0, 1.0));
        let state = model.reset(&start);
        assert_eq!(model.motor_count(), 2);
        let t = model.step(&state, &MotorCommand::idle(2), 0.01);
        assert_eq!(t.state, state);
        assert!(!t.crashed);
    }
}
