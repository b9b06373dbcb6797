//! Clock port: the single source of "now" for the core.

use relayhub_domain::time::Timestamp;

/// Supplies wall-clock time.
///
/// The core reads it once per inbound message and once per tick, and
/// computes everything else from that value.
pub trait Clock {
    /// Current time.
    fn now(&self) -> Timestamp;
}

impl<T: Clock + ?Sized> Clock for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
