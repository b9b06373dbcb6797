//! Output driver port: asserts or releases a physical output.

use relayhub_domain::device::OutputHandle;

/// Drives physical outputs (GPIO pins, relay boards, …).
///
/// Fire-and-forget: the core treats every call as infallible. Drivers that
/// can fail must log and swallow the error themselves.
pub trait OutputDriver {
    /// Set `output` high (`asserted == true`) or low.
    fn set_output(&self, output: OutputHandle, asserted: bool);
}

impl<T: OutputDriver + ?Sized> OutputDriver for std::sync::Arc<T> {
    fn set_output(&self, output: OutputHandle, asserted: bool) {
        (**self).set_output(output, asserted);
    }
}
