//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`.

/// Top-level error for every relayhub operation.
#[derive(Debug, thiserror::Error)]
pub enum RelayHubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("sender {sender} is not authorized")]
    Unauthorized { sender: String },
}

/// A domain invariant was violated by the caller's input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("name {0:?} must not contain whitespace")]
    WhitespaceInName(String),

    #[error("device {0:?} is configured more than once")]
    DuplicateName(String),

    #[error("auto-off minutes must be a positive integer")]
    InvalidMinutes,

    #[error("device {0:?} is off")]
    DeviceOff(String),
}

/// A lookup by name or identifier did not match anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id:?} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}
