//! # relayhub-adapter-virtual
//!
//! Virtual relay board that implements [`OutputDriver`] in memory, for
//! testing and running without hardware.
//!
//! | Call | Behaviour |
//! |------|-----------|
//! | `set_output(pin, true)` | Marks the pin asserted and logs it |
//! | `set_output(pin, false)` | Marks the pin released and logs it |
//!
//! ## Dependency rule
//!
//! Depends on `relayhub-app` (port traits) and `relayhub-domain` only.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use relayhub_app::ports::OutputDriver;
use relayhub_domain::device::OutputHandle;

/// Simulated relay board.
///
/// Pins that were never written read as `None`.
#[derive(Debug, Default)]
pub struct VirtualRelayBoard {
    levels: Mutex<BTreeMap<u8, bool>>,
}

impl VirtualRelayBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last level written to `output`.
    #[must_use]
    pub fn level(&self, output: OutputHandle) -> Option<bool> {
        self.levels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&output.pin())
            .copied()
    }

    /// Every pin currently asserted, in ascending order.
    #[must_use]
    pub fn asserted(&self) -> Vec<OutputHandle> {
        self.levels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, high)| **high)
            .map(|(pin, _)| OutputHandle::new(*pin))
            .collect()
    }
}

impl OutputDriver for VirtualRelayBoard {
    fn set_output(&self, output: OutputHandle, asserted: bool) {
        let previous = self
            .levels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(output.pin(), asserted);
        tracing::debug!(%output, asserted, ?previous, "virtual output written");
    }
}
