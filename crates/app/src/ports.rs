//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.
//!
//! Every port is synchronous: the core never suspends, and drivers are
//! expected to be fast, side-effecting calls.

pub mod clock;
pub mod event_bus;
pub mod output;

pub use clock::Clock;
pub use event_bus::EventPublisher;
pub use output::OutputDriver;
