//! # relayhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Act as a **message transport**: `POST /api/messages` feeds one inbound
//!   text message to the hub and returns its reply
//! - Serve a read-only **JSON snapshot** of the devices (`/api/devices`)
//! - Stream device events over **SSE** (`/api/events/stream`)
//! - Map application results into HTTP responses
//!
//! ## Dependency rule
//! Depends on `relayhub-app` (for the hub and port traits) and
//! `relayhub-domain` (for error types). Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
