//! Usage: accumulated ON time within the current accounting period.

use std::fmt;
use std::ops::{Add, AddAssign};

use chrono::TimeDelta;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Non-negative ON duration, reported in hours.
///
/// Stored as an exact [`TimeDelta`] so repeated ON/OFF cycles never drift;
/// conversion to fractional hours only happens for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Usage(TimeDelta);

impl Usage {
    /// No usage at all.
    #[must_use]
    pub fn zero() -> Self {
        Self(TimeDelta::zero())
    }

    /// Wrap a duration, clamping negative values to zero.
    #[must_use]
    pub fn from_duration(duration: TimeDelta) -> Self {
        Self(duration.max(TimeDelta::zero()))
    }

    /// The underlying duration.
    #[must_use]
    pub fn duration(self) -> TimeDelta {
        self.0
    }

    /// Usage expressed in fractional hours (`seconds / 3600`).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hours(self) -> f64 {
        self.0.num_milliseconds() as f64 / MILLIS_PER_HOUR
    }
}

impl Add<TimeDelta> for Usage {
    type Output = Self;

    fn add(self, rhs: TimeDelta) -> Self::Output {
        Self::from_duration(self.0 + rhs.max(TimeDelta::zero()))
    }
}

impl AddAssign<TimeDelta> for Usage {
    fn add_assign(&mut self, rhs: TimeDelta) {
        *self = *self + rhs;
    }
}

/// Two-decimal hours, e.g. `0.03`.
impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.hours())
    }
}
