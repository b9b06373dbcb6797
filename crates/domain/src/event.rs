//! Event: an immutable record of a device state change.
//!
//! Events are produced by the registry whenever a transition actually
//! happens; no-op commands produce no events.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Why a device was switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffCause {
    /// An explicit `<name>off` command.
    Command,
    /// The auto-off deadline passed.
    AutoOff,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceEventKind {
    TurnedOn,
    TurnedOff { cause: OffCause },
    AutoOffScheduled { deadline: Timestamp },
    /// All usage counters were zeroed; `device` is `None`.
    UsageReset,
}

/// A device event with the time it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEvent {
    /// Target device, `None` for registry-wide events.
    pub device: Option<String>,
    #[serde(flatten)]
    pub kind: DeviceEventKind,
    pub timestamp: Timestamp,
}

impl DeviceEvent {
    /// Create an event targeting one device.
    #[must_use]
    pub fn for_device(device: impl Into<String>, kind: DeviceEventKind, timestamp: Timestamp) -> Self {
        Self {
            device: Some(device.into()),
            kind,
            timestamp,
        }
    }

    /// Create a registry-wide event.
    #[must_use]
    pub fn global(kind: DeviceEventKind, timestamp: Timestamp) -> Self {
        Self {
            device: None,
            kind,
            timestamp,
        }
    }
}
