//! Event bus port: publish/subscribe for device events.

use relayhub_domain::event::DeviceEvent;

/// Publishes device events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers. Never blocks.
    fn publish(&self, event: DeviceEvent);
}

impl<T: EventPublisher + ?Sized> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: DeviceEvent) {
        (**self).publish(event);
    }
}
