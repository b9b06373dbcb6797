//! Auto-off scheduler: deadline-based automatic shutoff.

use chrono::TimeDelta;
use relayhub_domain::error::{RelayHubError, ValidationError};
use relayhub_domain::event::OffCause;
use relayhub_domain::time::Timestamp;

use crate::ports::OutputDriver;
use crate::registry::{DeviceKey, DeviceRegistry};

/// Sets deadlines and fires them.
///
/// Deadlines are data on the device, not timers: nothing happens until
/// [`tick`](Self::tick) is called with a time at or past the deadline.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoOffScheduler;

impl AutoOffScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Turn the device on (if needed) and schedule it off `minutes` from
    /// `now`, replacing any earlier deadline. Returns the deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMinutes`] when `minutes <= 0` (or
    /// too large to represent). The device is left untouched in that case.
    pub fn request_auto_off<O: OutputDriver>(
        self,
        registry: &mut DeviceRegistry<O>,
        key: DeviceKey,
        minutes: i64,
        now: Timestamp,
    ) -> Result<Timestamp, RelayHubError> {
        if minutes <= 0 {
            return Err(ValidationError::InvalidMinutes.into());
        }
        let deadline = TimeDelta::try_minutes(minutes)
            .and_then(|delay| now.checked_add_signed(delay))
            .ok_or(ValidationError::InvalidMinutes)?;

        registry.turn_on(key, now);
        registry.schedule_auto_off(key, deadline, now)?;
        Ok(deadline)
    }

    /// Turn off every device whose deadline is at or before `now`. Returns
    /// only the keys whose output actually changed.
    ///
    /// Idempotent: turning off clears the deadline, so a second call with
    /// the same `now` does nothing.
    pub fn tick<O: OutputDriver>(
        self,
        registry: &mut DeviceRegistry<O>,
        now: Timestamp,
    ) -> Vec<DeviceKey> {
        registry
            .due_auto_off(now)
            .into_iter()
            .filter(|key| registry.turn_off(*key, now, OffCause::AutoOff))
            .collect()
    }
}
