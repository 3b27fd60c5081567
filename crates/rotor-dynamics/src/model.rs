//! The multirotor flight model.

use nalgebra::Vector3;
use rotor_core::{
    ConfigError, Dynamics, MotorCommand, Pose, Transition, VehicleParameters, VehicleState,
};

use crate::environment::Environment;
use crate::integrator::{self, MassProperties};
use crate::mixer::Mixer;
use crate::motor;

/// Rigid-body dynamics of a multirotor with lagged motors.
///
/// Holds only validated, immutable parameters; every step is a pure
/// function of `(state, command, dt)`.
///
/// # Ground contact
///
/// A vehicle is `airborne` once it has been strictly above ground since
/// the last reset. Reaching the ground while airborne is a crash: the
/// vehicle is clamped to the ground with zero velocity and every later
/// step returns the same state until reset. Before liftoff the ground
/// simply supports it: position and attitude are held until thrust lifts
/// the vehicle clear.
///
/// A command whose length differs from the motor count is refused and
/// the state is returned unchanged.
#[derive(Clone, Debug)]
pub struct MultirotorDynamics {
    params: VehicleParameters,
    env: Environment,
    mixer: Mixer,
    body: MassProperties,
    max_rate: f64,
}

impl MultirotorDynamics {
    /// Validate `params` and `env` and build the model.
    pub fn new(params: VehicleParameters, env: Environment) -> Result<Self, ConfigError> {
        params.validate()?;
        env.validate()?;
        let mixer = Mixer::new(&params);
        let body = MassProperties {
            mass: params.m,
            inertia: Vector3::new(params.ix, params.iy, params.iz),
            rotor_inertia: params.jr,
        };
        let max_rate = params.max_motor_rate();
        Ok(Self {
            params,
            env,
            mixer,
            body,
            max_rate,
        })
    }

    /// The vehicle parameters.
    pub fn parameters(&self) -> &VehicleParameters {
        &self.params
    }

    /// The environment.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Uniform command whose steady-state thrust equals the vehicle's
    /// weight, or `None` if full throttle cannot lift it.
    pub fn hover_command(&self) -> Option<MotorCommand> {
        let throttle = self.params.hover_throttle(self.env.gravity)?;
        Some(MotorCommand::uniform(self.params.motor_count(), throttle))
    }

    /// Reset state at `pose` with the rotors already spinning at the
    /// hover rate, or `None` if the vehicle cannot hover.
    pub fn hover_state(&self, pose: &Pose) -> Option<VehicleState> {
        let command = self.hover_command()?;
        let mut state = self.reset(pose);
        state.motor_speeds = command.values().iter().map(|u| u * self.max_rate).collect();
        Some(state)
    }

    fn diverged(&self, previous: &VehicleState) -> Transition {
        log::warn!(
            "integration diverged at altitude {:.3} m, holding last finite state",
            previous.position.z
        );
        let mut state = previous.clone();
        state.position.z = state.position.z.max(self.env.ground_level);
        state.velocity = Vector3::zeros();
        state.angular_velocity = Vector3::zeros();
        state.crashed = true;
        Transition {
            state,
            crashed: true,
        }
    }
}

impl Dynamics for MultirotorDynamics {
    fn motor_count(&self) -> usize {
        self.params.motor_count()
    }

    fn max_motor_rate(&self) -> f64 {
        self.max_rate
    }

    fn reset(&self, pose: &Pose) -> VehicleState {
        let mut state = VehicleState::at_rest(pose, self.params.motor_count());
        state.airborne = pose.position.z > self.env.ground_level;
        state
    }

    fn step(&self, state: &VehicleState, command: &MotorCommand, dt: f64) -> Transition {
        if state.crashed {
            return Transition {
                state: state.clone(),
                crashed: true,
            };
        }
        if let Err(e) = command.check_shape(self.params.motor_count()) {
            log::warn!("step refused: {e}");
            return Transition {
                state: state.clone(),
                crashed: false,
            };
        }

        let speeds = motor::advance(
            &state.motor_speeds,
            command,
            self.max_rate,
            self.params.motor_tau,
            dt,
        );
        let wrench = self.mixer.wrench(&speeds);
        let linear = integrator::linear_acceleration(
            &state.orientation,
            wrench.thrust,
            self.body.mass,
            self.env.gravity,
        );
        let angular = integrator::angular_acceleration(&state.angular_velocity, &self.body, &wrench);
        let mut next = integrator::semi_implicit_euler(state, speeds, &linear, &angular, dt);

        if !next.is_finite() {
            return self.diverged(state);
        }

        let ground = self.env.ground_level;
        if next.position.z <= ground {
            next.position.z = ground;
            next.velocity = Vector3::zeros();
            next.angular_velocity = Vector3::zeros();
            if next.airborne {
                log::info!(
                    "ground contact at {:.2} m/s, vehicle crashed",
                    state.velocity.norm()
                );
                next.crashed = true;
            } else {
                next.position.x = state.position.x;
                next.position.y = state.position.y;
                next.orientation = state.orientation;
            }
        } else {
            next.airborne = true;
        }

        let crashed = next.crashed;
        Transition {
            state: next,
            crashed,
        }
    }
}

// Compile-time assertion: the model moves onto the simulation thread.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<MultirotorDynamics>();
};
