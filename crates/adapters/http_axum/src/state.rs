//! Shared application state for axum handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use relayhub_app::event_bus::InProcessEventBus;
use relayhub_app::hub::Hub;
use relayhub_app::ports::{Clock, EventPublisher, OutputDriver};

/// The hub behind the single lock shared by every caller.
pub type SharedHub<C, O, P> = Arc<Mutex<Hub<C, O, P>>>;

/// Application state shared across all axum handlers.
///
/// Generic over the hub's clock, output driver, and publisher to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`: only the `Arc` wrappers are cloned.
pub struct AppState<C, O, P> {
    /// The device engine. Never hold the guard across an `.await`.
    pub hub: SharedHub<C, O, P>,
    /// Bus the hub publishes to, for SSE subscribers.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<C, O, P> Clone for AppState<C, O, P> {
    fn clone(&self) -> Self {
        Self {
            hub: Arc::clone(&self.hub),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<C, O, P> AppState<C, O, P>
where
    C: Clock + Send + 'static,
    O: OutputDriver + Send + 'static,
    P: EventPublisher + Send + 'static,
{
    /// Create a new application state from a pre-wrapped hub.
    ///
    /// The hub is shared with the tick loop, so it is handed over already
    /// inside its `Arc<Mutex<_>>`.
    pub fn new(hub: SharedHub<C, O, P>, event_bus: Arc<InProcessEventBus>) -> Self {
        Self { hub, event_bus }
    }

    /// Lock the hub. A poisoned lock is recovered: every hub operation
    /// leaves the registry consistent before it can panic.
    pub fn lock_hub(&self) -> MutexGuard<'_, Hub<C, O, P>> {
        self.hub.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use chrono::TimeDelta;

    use relayhub_app::clock::ManualClock;
    use relayhub_app::event_bus::InProcessEventBus;
    use relayhub_app::hub::{Hub, HubSettings};
    use relayhub_app::ports::OutputDriver;
    use relayhub_domain::device::{Device, OutputHandle};

    use super::AppState;

    pub const ADMIN: &str = "123456789";

    pub struct NullOutput;

    impl OutputDriver for NullOutput {
        fn set_output(&self, _output: OutputHandle, _asserted: bool) {}
    }

    pub type TestState = AppState<Arc<ManualClock>, NullOutput, Arc<InProcessEventBus>>;

    pub fn test_state() -> (TestState, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at_epoch_secs(0));
        let event_bus = Arc::new(InProcessEventBus::new(16));
        let devices = [("light", 12), ("fan", 14)]
            .into_iter()
            .map(|(name, pin)| {
                Device::builder()
                    .name(name)
                    .output(OutputHandle::new(pin))
                    .build()
                    .unwrap()
            })
            .collect();
        let hub = Hub::new(
            HubSettings {
                authorized_sender: ADMIN.to_string(),
                prefix: '/',
                usage_period: TimeDelta::hours(24),
            },
            devices,
            Arc::clone(&clock),
            NullOutput,
            Arc::clone(&event_bus),
        )
        .unwrap();
        (
            AppState::new(Arc::new(Mutex::new(hub)), event_bus),
            clock,
        )
    }
}
