//! Concrete [`Clock`] implementations.

use std::sync::{Mutex, PoisonError};

use chrono::TimeDelta;
use relayhub_domain::time::{self, Timestamp};

use crate::ports::Clock;

/// Wall clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        time::now()
    }
}

/// A clock that only moves when told to.
///
/// Used by tests and simulations to drive deadlines and period resets
/// deterministically.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Clock starting at `secs` seconds after the Unix epoch.
    #[must_use]
    pub fn at_epoch_secs(secs: i64) -> Self {
        Self::new(Timestamp::from_timestamp(secs, 0).unwrap_or_default())
    }

    /// Jump to an absolute time (which may be in the past).
    pub fn set(&self, now: Timestamp) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Move forward by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
