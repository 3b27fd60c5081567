//! First-order motor response.
//!
//! A motor does not reach its commanded speed instantly. Each motor
//! follows `dw/dt = (w_cmd - w) / tau`, integrated exactly over one
//! timestep so the response is stable for any `dt`.

use rotor_core::{MotorCommand, MotorValues};

/// Fraction of the gap to the commanded speed closed in `dt` seconds.
///
/// In `[0, 1]` for non-negative `dt`; 1 means the motor reaches its
/// target within the step.
pub fn lag_factor(dt: f64, tau: f64) -> f64 {
    1.0 - (-dt / tau).exp()
}

/// Motor speeds (rad/s) after `dt` seconds under `command`.
pub fn advance(
    speeds: &[f64],
    command: &MotorCommand,
    max_rate: f64,
    tau: f64,
    dt: f64,
) -> MotorValues {
    let alpha = lag_factor(dt, tau);
    speeds
        .iter()
        .zip(command.values())
        .map(|(&w, &u)| w + (u * max_rate - w) * alpha)
        .collect()
}
