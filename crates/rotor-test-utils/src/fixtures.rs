//! Reusable dynamics test doubles.
//!
//! - [`CounterDynamics`]: every position component counts steps; motor
//!   speeds echo the last command.
//! - [`SinkingDynamics`]: descends one metre per step and crashes at the
//!   ground.
//! - [`StallingDynamics`]: each step blocks for a fixed wall-clock delay.
//! - [`PanickingDynamics`]: panics on a chosen step.

use std::thread;
use std::time::Duration;

use nalgebra::Vector3;
use rotor_core::{Dynamics, MotorCommand, Pose, Transition, VehicleState};

/// Advances every position component by exactly 1.0 per step.
///
/// After `k` steps from pose `p`, position is `p + (k, k, k)`, so a
/// snapshot whose components disagree was assembled from two steps.
/// Motor speeds are set to the command values (max rate 1.0).
pub struct CounterDynamics {
    pub motors: usize,
}

impl CounterDynamics {
    pub fn new(motors: usize) -> Self {
        Self { motors }
    }
}

impl Dynamics for CounterDynamics {
    fn motor_count(&self) -> usize {
        self.motors
    }

    fn max_motor_rate(&self) -> f64 {
        1.0
    }

    fn reset(&self, pose: &Pose) -> VehicleState {
        let mut state = VehicleState::at_rest(pose, self.motors);
        state.airborne = true;
        state
    }

    fn step(&self, state: &VehicleState, command: &MotorCommand, _dt: f64) -> Transition {
        let mut next = state.clone();
        next.velocity = Vector3::new(1.0, 1.0, 1.0);
        next.position += next.velocity;
        next.motor_speeds = command.values().iter().copied().collect();
        Transition {
            state: next,
            crashed: false,
        }
    }
}

/// Descends 1.0 m per step and crashes on reaching z = 0.
///
/// Started at altitude `n`, the crash lands on step `n` exactly.
pub struct SinkingDynamics {
    pub motors: usize,
}

impl Dynamics for SinkingDynamics {
    fn motor_count(&self) -> usize {
        self.motors
    }

    fn max_motor_rate(&self) -> f64 {
        1.0
    }

    fn reset(&self, pose: &Pose) -> VehicleState {
        let mut state = VehicleState::at_rest(pose, self.motors);
        state.airborne = pose.position.z > 0.0;
        state
    }

    fn step(&self, state: &VehicleState, _command: &MotorCommand, _dt: f64) -> Transition {
        let mut next = state.clone();
        if !next.crashed {
            next.position.z = (next.position.z - 1.0).max(0.0);
            next.crashed = next.position.z <= 0.0;
        }
        let crashed = next.crashed;
        Transition {
            state: next,
            crashed,
        }
    }
}

/// Blocks for `delay` inside every step.
///
/// Used to hold the simulation thread past a stop deadline.
pub struct StallingDynamics {
    pub motors: usize,
    pub delay: Duration,
}

impl Dynamics for StallingDynamics {
    fn motor_count(&self) -> usize {
        self.motors
    }

    fn max_motor_rate(&self) -> f64 {
        1.0
    }

    fn reset(&self, pose: &Pose) -> VehicleState {
        VehicleState::at_rest(pose, self.motors)
    }

    fn step(&self, state: &VehicleState, _command: &MotorCommand, _dt: f64) -> Transition {
        thread::sleep(self.delay);
        Transition {
            state: state.clone(),
            crashed: false,
        }
    }
}

/// Counts steps in `position.x` and panics when it reaches `panic_at`.
pub struct PanickingDynamics {
    pub motors: usize,
    pub panic_at: f64,
}

impl Dynamics for PanickingDynamics {
    fn motor_count(&self) -> usize {
        self.motors
    }

    fn max_motor_rate(&self) -> f64 {
        1.0
    }

    fn reset(&self, pose: &Pose) -> VehicleState {
        VehicleState::at_rest(pose, self.motors)
    }

    fn step(&self, state: &VehicleState, _command: &MotorCommand, _dt: f64) -> Transition {
        let mut next = state.clone();
        next.position.x += 1.0;
        if next.position.x >= self.panic_at {
            panic!("test dynamics panic at x = {}", next.position.x);
        }
        Transition {
            state: next,
            crashed: false,
        }
    }
}
