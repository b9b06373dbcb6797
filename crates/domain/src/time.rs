//! Time and timestamp helpers.

use chrono::{DateTime, TimeDelta, Utc};

/// UTC timestamp used for activation times, deadlines, and event times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Time elapsed from `since` to `until`, clamped at zero when the clock has
/// moved backwards.
#[must_use]
pub fn elapsed(since: Timestamp, until: Timestamp) -> TimeDelta {
    (until - since).max(TimeDelta::zero())
}
