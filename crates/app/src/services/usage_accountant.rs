//! Usage accountant: rolls usage counters over at the end of each period.

use chrono::TimeDelta;
use relayhub_domain::time::Timestamp;

use crate::ports::OutputDriver;
use crate::registry::DeviceRegistry;

/// Tracks the rolling accounting period boundary.
///
/// The period is wall-clock elapsed, not calendar aligned. A stalled tick
/// loop delays the reset by the stall duration; at most one reset happens
/// per tick, and the new boundary is the tick time itself.
#[derive(Debug, Clone)]
pub struct UsageAccountant {
    period: TimeDelta,
    last_reset_at: Timestamp,
}

impl UsageAccountant {
    /// Start a period at `started_at`.
    #[must_use]
    pub fn new(period: TimeDelta, started_at: Timestamp) -> Self {
        Self {
            period,
            last_reset_at: started_at,
        }
    }

    #[must_use]
    pub fn period(&self) -> TimeDelta {
        self.period
    }

    #[must_use]
    pub fn last_reset_at(&self) -> Timestamp {
        self.last_reset_at
    }

    /// Reset all usage when the period has elapsed. Returns whether a reset
    /// happened.
    pub fn tick<O: OutputDriver>(
        &mut self,
        registry: &mut DeviceRegistry<O>,
        now: Timestamp,
    ) -> bool {
        if now - self.last_reset_at < self.period {
            return false;
        }
        tracing::debug!(last_reset_at = %self.last_reset_at, %now, "accounting period elapsed");
        registry.reset_all_usage(now);
        self.last_reset_at = now;
        true
    }
}
