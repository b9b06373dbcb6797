//! In-process event bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use relayhub_domain::event::DeviceEvent;

use crate::ports::EventPublisher;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
pub struct InProcessEventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: DeviceEvent) {
        // send only fails when nobody is subscribed.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relayhub_domain::event::DeviceEventKind;
    use relayhub_domain::time::now;

    fn turned_on(device: &str) -> DeviceEvent {
        DeviceEvent::for_device(device, DeviceEventKind::TurnedOn, now())
    }

    #[tokio::test]
    async fn should_deliver_event_to_subscriber() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(turned_on("fan"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.device.as_deref(), Some("fan"));
        assert_eq!(received.kind, DeviceEventKind::TurnedOn);
    }

    #[tokio::test]
    async fn should_deliver_event_to_multiple_subscribers() {
        let bus = InProcessEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(DeviceEvent::global(DeviceEventKind::UsageReset, now()));

        let r1 = rx1.recv().await.unwrap();
        let r2 = rx2.recv().await.unwrap();
        assert_eq!(r1.kind, DeviceEventKind::UsageReset);
        assert_eq!(r2.kind, DeviceEventKind::UsageReset);
    }

    #[test]
    fn should_succeed_when_no_subscribers() {
        let bus = InProcessEventBus::new(16);
        bus.publish(turned_on("tv"));
    }

    #[tokio::test]
    async fn should_not_deliver_events_published_before_subscription() {
        let bus = InProcessEventBus::new(16);
        bus.publish(turned_on("tv"));

        let mut rx = bus.subscribe();
        bus.publish(turned_on("ac"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.device.as_deref(), Some("ac"));
    }
}
