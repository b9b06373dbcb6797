//! Device: a named binary-state output with usage accounting and an
//! optional auto-off deadline.

use serde::Serialize;

use crate::error::{RelayHubError, ValidationError};
use crate::time::{Timestamp, elapsed};
use crate::usage::Usage;

/// Opaque reference to a physical output, owned by the output driver.
///
/// For GPIO-backed drivers this is the pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OutputHandle(u8);

impl OutputHandle {
    #[must_use]
    pub const fn new(pin: u8) -> Self {
        Self(pin)
    }

    #[must_use]
    pub const fn pin(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for OutputHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pin {}", self.0)
    }
}

/// Binary power state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    #[default]
    Off,
}

impl PowerState {
    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("ON"),
            Self::Off => f.write_str("OFF"),
        }
    }
}

/// A controllable output.
///
/// Fields are private: every mutation goes through a method that keeps the
/// invariants below.
///
/// - `auto_off_deadline.is_some()` implies `state == On`
/// - `activated_at.is_some()` iff `state == On`
/// - `accumulated_usage` only grows between resets
#[derive(Debug, Clone)]
pub struct Device {
    name: String,
    output: OutputHandle,
    state: PowerState,
    activated_at: Option<Timestamp>,
    accumulated_usage: Usage,
    auto_off_deadline: Option<Timestamp>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn output(&self) -> OutputHandle {
        self.output
    }

    #[must_use]
    pub fn state(&self) -> PowerState {
        self.state
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state.is_on()
    }

    #[must_use]
    pub fn activated_at(&self) -> Option<Timestamp> {
        self.activated_at
    }

    /// Usage folded in by completed ON periods, excluding the running one.
    #[must_use]
    pub fn accumulated_usage(&self) -> Usage {
        self.accumulated_usage
    }

    #[must_use]
    pub fn auto_off_deadline(&self) -> Option<Timestamp> {
        self.auto_off_deadline
    }

    /// Usage including the running ON period, if any.
    #[must_use]
    pub fn current_usage(&self, now: Timestamp) -> Usage {
        match self.activated_at {
            Some(since) => self.accumulated_usage + elapsed(since, now),
            None => self.accumulated_usage,
        }
    }

    /// Whether an auto-off deadline exists and has passed.
    #[must_use]
    pub fn is_auto_off_due(&self, now: Timestamp) -> bool {
        self.auto_off_deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Switch on. Returns `false` when already on.
    pub fn turn_on(&mut self, now: Timestamp) -> bool {
        if self.is_on() {
            return false;
        }
        self.state = PowerState::On;
        self.activated_at = Some(now);
        true
    }

    /// Switch off, folding the running ON period into the accumulator and
    /// clearing any deadline. Returns `false` when already off.
    pub fn turn_off(&mut self, now: Timestamp) -> bool {
        if !self.is_on() {
            return false;
        }
        if let Some(since) = self.activated_at.take() {
            self.accumulated_usage += elapsed(since, now);
        }
        self.auto_off_deadline = None;
        self.state = PowerState::Off;
        true
    }

    /// Set (or replace) the auto-off deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DeviceOff`] when the device is off.
    pub fn schedule_auto_off(&mut self, deadline: Timestamp) -> Result<(), RelayHubError> {
        if !self.is_on() {
            return Err(ValidationError::DeviceOff(self.name.clone()).into());
        }
        self.auto_off_deadline = Some(deadline);
        Ok(())
    }

    /// Zero the accumulator. State, activation time, and deadline are untouched.
    pub fn reset_usage(&mut self) {
        self.accumulated_usage = Usage::zero();
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::Validation`] when `name` is empty or contains
    /// whitespace (the command grammar splits on spaces).
    pub fn validate(&self) -> Result<(), RelayHubError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(ValidationError::WhitespaceInName(self.name.clone()).into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
///
/// Devices always start off, with zero usage and no deadline.
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    name: Option<String>,
    output: Option<OutputHandle>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn output(mut self, output: OutputHandle) -> Self {
        self.output = Some(output);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::Validation`] if `name` is missing, empty, or
    /// contains whitespace.
    pub fn build(self) -> Result<Device, RelayHubError> {
        let device = Device {
            name: self.name.unwrap_or_default(),
            output: self.output.unwrap_or(OutputHandle::new(0)),
            state: PowerState::Off,
            activated_at: None,
            accumulated_usage: Usage::zero(),
            auto_off_deadline: None,
        };
        device.validate()?;
        Ok(device)
    }
}
