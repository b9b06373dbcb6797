//! # relayhub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Clock`: the source of "now"
//!   - `OutputDriver`: asserts or releases a physical output
//!   - `EventPublisher`: fans out device events
//! - Own the device state: `DeviceRegistry`
//! - Provide the use-cases:
//!   - `CommandInterpreter`: executes parsed commands and renders replies
//!   - `AutoOffScheduler`: deadlines and their expiry
//!   - `UsageAccountant`: periodic usage reset
//!   - `Hub`: the authorization boundary tying them together
//! - Provide **in-process infrastructure** (event bus, clocks) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `relayhub-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod clock;
pub mod event_bus;
pub mod hub;
pub mod ports;
pub mod registry;
pub mod services;

#[cfg(test)]
mod test_support;
