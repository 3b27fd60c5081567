//! Latest-command mailbox between consumer threads and the simulation
//! thread.
//!
//! The mailbox is a `bounded(1)` channel. [`CommandSender`] validates a
//! command on the submitting thread, so a malformed command never enters
//! it, and a new command replaces one that has not been taken yet. The
//! simulation thread calls [`take_latest()`] once per step, so each step
//! flies the most recent command written before it.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use rotor_core::{CommandError, MotorCommand};

use crate::metrics::MetricsCounters;

/// Create the command mailbox for a vehicle with `motor_count` motors.
pub fn mailbox(
    motor_count: usize,
    counters: Arc<MetricsCounters>,
) -> (CommandSender, Receiver<MotorCommand>) {
    let (tx, rx) = crossbeam_channel::bounded(1);
    (
        CommandSender {
            tx,
            pending: rx.clone(),
            motor_count,
            counters,
        },
        rx,
    )
}

/// Writing half of the command mailbox.
#[derive(Clone)]
pub struct CommandSender {
    tx: Sender<MotorCommand>,
    // Used only to evict a command the simulation thread has not taken.
    pending: Receiver<MotorCommand>,
    motor_count: usize,
    counters: Arc<MetricsCounters>,
}

impl CommandSender {
    /// Validate raw throttle values and post them.
    pub fn submit_values(&self, values: &[f64]) -> Result<(), CommandError> {
        let command = MotorCommand::new(values).inspect_err(|_| self.counters.record_rejected())?;
        self.submit(command)
    }

    /// Post a command after checking its length, replacing any command
    /// still waiting in the mailbox.
    ///
    /// Never blocks.
    pub fn submit(&self, command: MotorCommand) -> Result<(), CommandError> {
        command
            .check_shape(self.motor_count)
            .inspect_err(|_| self.counters.record_rejected())?;
        let mut command = command;
        loop {
            match self.tx.try_send(command) {
                Ok(()) => return Ok(()),
                Err(TrySendError::Full(unsent)) => {
                    // Another writer may refill the slot between these two
                    // calls; the retry then replaces that command instead.
                    if self.pending.try_recv().is_ok() {
                        self.counters.record_superseded();
                    }
                    command = unsent;
                }
                Err(TrySendError::Disconnected(_)) => {
                    self.counters.record_rejected();
                    return Err(CommandError::Shutdown);
                }
            }
        }
    }

    /// Motor count commands are checked against.
    pub fn motor_count(&self) -> usize {
        self.motor_count
    }
}

/// Take the command waiting in the mailbox, if any.
pub fn take_latest(rx: &Receiver<MotorCommand>) -> Option<MotorCommand> {
    rx.try_recv().ok()
}
