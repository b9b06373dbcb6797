//! Application services: use-case implementations.
//!
//! Each service operates on a [`DeviceRegistry`](crate::registry::DeviceRegistry)
//! passed in by the caller, keeping this layer decoupled from concrete
//! output drivers.

pub mod auto_off_scheduler;
pub mod command_interpreter;
pub mod usage_accountant;
