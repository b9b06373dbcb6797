//! # relayhub-domain
//!
//! Pure domain model for the relayhub relay controller.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Devices** (named binary-state outputs with usage accounting
//!   and an optional auto-off deadline)
//! - Define **Usage** (ON time within the current accounting period)
//! - Define the **Command** grammar (text line → typed command)
//! - Define **Events** (device state-change records)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod command;
pub mod device;
pub mod event;
pub mod usage;
