//! Command interpreter: executes parsed commands and renders reply text.
//!
//! Each handler returns `Result<String, RelayHubError>`. Errors never reach
//! the caller: [`error_reply`] decides per command whether a failure is
//! answered or silently dropped.

use std::fmt::Write as _;

use chrono::TimeDelta;
use relayhub_domain::command::{Command, HELP_FORMS};
use relayhub_domain::device::{Device, PowerState};
use relayhub_domain::error::{RelayHubError, ValidationError};
use relayhub_domain::event::OffCause;
use relayhub_domain::time::Timestamp;

use crate::ports::OutputDriver;
use crate::registry::DeviceRegistry;
use crate::services::auto_off_scheduler::AutoOffScheduler;

/// Reply sent when `status <name>` names an unknown device.
pub const DEVICE_NOT_FOUND: &str = "Device not found.";

/// Reply sent after `reset`.
pub const USAGE_RESET: &str = "Usage stats reset to 0.";

/// Turns [`Command`]s into registry mutations and reply text.
#[derive(Debug, Clone)]
pub struct CommandInterpreter {
    prefix: char,
    period: TimeDelta,
    scheduler: AutoOffScheduler,
}

impl CommandInterpreter {
    /// `prefix` is only used to render the help text; `period` is the
    /// accounting period quoted by `usage` replies.
    #[must_use]
    pub fn new(prefix: char, period: TimeDelta) -> Self {
        Self {
            prefix,
            period,
            scheduler: AutoOffScheduler::new(),
        }
    }

    /// Execute `command` and return the reply, if any.
    pub fn execute<O: OutputDriver>(
        &self,
        command: &Command,
        registry: &mut DeviceRegistry<O>,
        now: Timestamp,
    ) -> Option<String> {
        match self.run(command, registry, now) {
            Ok(reply) => Some(reply),
            Err(err) => {
                tracing::debug!(?command, error = %err, "command rejected");
                error_reply(command, &err)
            }
        }
    }

    fn run<O: OutputDriver>(
        &self,
        command: &Command,
        registry: &mut DeviceRegistry<O>,
        now: Timestamp,
    ) -> Result<String, RelayHubError> {
        match command {
            Command::Start => Ok(self.help()),
            Command::ListAllDevices => Ok(list_devices(registry)),
            Command::StatusAll => Ok(status_all(registry, now)),
            Command::Status { device } => {
                let key = registry.lookup(device)?;
                Ok(status_line(registry.get(key), now))
            }
            Command::Reset => {
                registry.reset_all_usage(now);
                Ok(USAGE_RESET.to_string())
            }
            Command::AutoOff { device, minutes } => {
                let key = registry.lookup(device)?;
                let minutes = minutes.ok_or(ValidationError::InvalidMinutes)?;
                self.scheduler.request_auto_off(registry, key, minutes, now)?;
                Ok(format!(
                    "{} will auto-off in {minutes} mins.",
                    registry.get(key).name()
                ))
            }
            Command::Usage { device } => {
                let key = registry.lookup(device)?;
                let device = registry.get(key);
                Ok(format!(
                    "{} used for {} hrs in last {} hrs",
                    device.name(),
                    device.current_usage(now),
                    period_hours(self.period)
                ))
            }
            Command::Switch { device, state } => {
                let key = registry.lookup(device)?;
                match state {
                    PowerState::On => registry.turn_on(key, now),
                    PowerState::Off => registry.turn_off(key, now, OffCause::Command),
                };
                Ok(format!("{} turned {state}", registry.get(key).name()))
            }
        }
    }

    fn help(&self) -> String {
        let mut reply = String::from("Available commands:\n");
        for form in HELP_FORMS {
            let _ = writeln!(reply, "{}{form}", self.prefix);
        }
        reply
    }
}

/// Only `status <name>` answers a lookup miss; everything else fails silently.
fn error_reply(command: &Command, err: &RelayHubError) -> Option<String> {
    match (command, err) {
        (Command::Status { .. }, RelayHubError::NotFound(_)) => Some(DEVICE_NOT_FOUND.to_string()),
        _ => None,
    }
}

fn list_devices<O: OutputDriver>(registry: &DeviceRegistry<O>) -> String {
    let mut reply = String::from("Devices:\n");
    for (_, device) in registry.iter() {
        let _ = writeln!(reply, "- {}", device.name());
    }
    reply
}

fn status_all<O: OutputDriver>(registry: &DeviceRegistry<O>, now: Timestamp) -> String {
    let mut reply = String::from("Device Status & Usage:\n");
    for (_, device) in registry.iter() {
        reply.push_str(&status_line(device, now));
        reply.push('\n');
    }
    reply
}

fn status_line(device: &Device, now: Timestamp) -> String {
    format!(
        "{}: {}, {} hrs",
        device.name(),
        device.state(),
        device.current_usage(now)
    )
}

/// Whole hours when the period is a multiple of an hour, two decimals otherwise.
fn period_hours(period: TimeDelta) -> String {
    let secs = period.num_seconds();
    if secs % 3600 == 0 {
        (secs / 3600).to_string()
    } else {
        #[allow(clippy::cast_precision_loss)]
        let hours = secs as f64 / 3600.0;
        format!("{hours:.2}")
    }
}
