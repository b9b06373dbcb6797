//! Hub: the boundary between transports and the device engine.
//!
//! The hub owns the registry, the accountant, and the interpreter. It reads
//! the clock once per inbound message and once per tick, enforces the single
//! authorized sender, strips the command prefix, and publishes the device
//! events every operation produced.

use chrono::TimeDelta;
use serde::Serialize;

use relayhub_domain::command::Command;
use relayhub_domain::device::{Device, OutputHandle, PowerState};
use relayhub_domain::error::RelayHubError;
use relayhub_domain::time::Timestamp;

use crate::ports::{Clock, EventPublisher, OutputDriver};
use crate::registry::DeviceRegistry;
use crate::services::auto_off_scheduler::AutoOffScheduler;
use crate::services::command_interpreter::CommandInterpreter;
use crate::services::usage_accountant::UsageAccountant;

/// Fixed reply for senders other than the authorized principal.
pub const ACCESS_DENIED: &str = "Access denied: Not authorized.";

/// Static hub settings.
#[derive(Debug, Clone)]
pub struct HubSettings {
    /// The only sender whose commands are executed.
    pub authorized_sender: String,
    /// Character every command line must start with.
    pub prefix: char,
    /// Length of the usage accounting period.
    pub usage_period: TimeDelta,
}

/// A text message delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub sender: String,
    pub text: String,
}

impl InboundMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }
}

/// A reply for the transport to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub recipient: String,
    pub text: String,
}

/// What a tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Names of devices switched off by their deadline.
    pub switched_off: Vec<String>,
    /// Whether the accounting period rolled over.
    pub usage_reset: bool,
}

/// Read model of one device, for adapters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    pub name: String,
    pub output: OutputHandle,
    pub state: PowerState,
    pub usage_hours: f64,
    pub activated_at: Option<Timestamp>,
    pub auto_off_deadline: Option<Timestamp>,
}

impl DeviceSnapshot {
    fn new(device: &Device, now: Timestamp) -> Self {
        Self {
            name: device.name().to_string(),
            output: device.output(),
            state: device.state(),
            usage_hours: device.current_usage(now).hours(),
            activated_at: device.activated_at(),
            auto_off_deadline: device.auto_off_deadline(),
        }
    }
}

/// Single-threaded device engine with an authorization boundary.
pub struct Hub<C, O, P> {
    clock: C,
    publisher: P,
    registry: DeviceRegistry<O>,
    accountant: UsageAccountant,
    scheduler: AutoOffScheduler,
    interpreter: CommandInterpreter,
    authorized_sender: String,
    prefix: char,
}

impl<C, O, P> Hub<C, O, P>
where
    C: Clock,
    O: OutputDriver,
    P: EventPublisher,
{
    /// Build the registry from `devices` and start the first accounting
    /// period at the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::Validation`] when the device list is invalid.
    pub fn new(
        settings: HubSettings,
        devices: Vec<Device>,
        clock: C,
        output: O,
        publisher: P,
    ) -> Result<Self, RelayHubError> {
        let registry = DeviceRegistry::new(devices, output)?;
        let started_at = clock.now();
        Ok(Self {
            accountant: UsageAccountant::new(settings.usage_period, started_at),
            scheduler: AutoOffScheduler::new(),
            interpreter: CommandInterpreter::new(settings.prefix, settings.usage_period),
            authorized_sender: settings.authorized_sender,
            prefix: settings.prefix,
            clock,
            publisher,
            registry,
        })
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry<O> {
        &self.registry
    }

    #[must_use]
    pub fn accountant(&self) -> &UsageAccountant {
        &self.accountant
    }

    /// Process one inbound message to completion.
    ///
    /// Unauthorized senders always get [`ACCESS_DENIED`]. Authorized lines
    /// without the prefix, or that match no command, get no reply.
    #[tracing::instrument(skip(self, message), fields(sender = %message.sender))]
    pub fn handle_message(&mut self, message: &InboundMessage) -> Option<OutboundMessage> {
        if let Err(err) = self.authorize(&message.sender) {
            tracing::warn!(error = %err, "rejecting message");
            return Some(reply_to(message, ACCESS_DENIED.to_string()));
        }

        let text = message.text.trim().to_lowercase();
        let Some(body) = text.strip_prefix(self.prefix) else {
            tracing::debug!("ignoring line without command prefix");
            return None;
        };
        let Some((rule, command)) = Command::parse_with_rule(body) else {
            tracing::debug!(line = body, "ignoring unknown command");
            return None;
        };
        tracing::debug!(rule, device = command.device(), "command matched");

        let now = self.clock.now();
        let reply = self.interpreter.execute(&command, &mut self.registry, now);
        self.flush_events();
        reply.map(|text| reply_to(message, text))
    }

    /// Apply due auto-offs and the periodic usage reset.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now();
        let switched_off = self
            .scheduler
            .tick(&mut self.registry, now)
            .into_iter()
            .map(|key| self.registry.get(key).name().to_string())
            .collect();
        let usage_reset = self.accountant.tick(&mut self.registry, now);
        self.flush_events();
        TickReport {
            switched_off,
            usage_reset,
        }
    }

    /// Snapshot of every device, in configuration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DeviceSnapshot> {
        let now = self.clock.now();
        self.registry
            .iter()
            .map(|(_, device)| DeviceSnapshot::new(device, now))
            .collect()
    }

    /// Snapshot of one device.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::NotFound`] when no device has that name.
    pub fn device_snapshot(&self, name: &str) -> Result<DeviceSnapshot, RelayHubError> {
        let key = self.registry.lookup(name)?;
        Ok(DeviceSnapshot::new(self.registry.get(key), self.clock.now()))
    }

    /// Check that `sender` is the authorized principal.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::Unauthorized`] for any other sender.
    pub fn authorize(&self, sender: &str) -> Result<(), RelayHubError> {
        if sender == self.authorized_sender {
            Ok(())
        } else {
            Err(RelayHubError::Unauthorized {
                sender: sender.to_string(),
            })
        }
    }

    fn flush_events(&mut self) {
        for event in self.registry.drain_events() {
            self.publisher.publish(event);
        }
    }
}

fn reply_to(message: &InboundMessage, text: String) -> OutboundMessage {
    OutboundMessage {
        recipient: message.sender.clone(),
        text,
    }
}
