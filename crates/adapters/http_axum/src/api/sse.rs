//! Server-Sent Events (SSE) stream for real-time updates.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use relayhub_app::ports::{Clock, EventPublisher, OutputDriver};

use crate::state::AppState;

/// `GET /api/events/stream`: SSE stream of device events.
///
/// Subscribes to the event bus broadcast channel and sends JSON-encoded
/// events as SSE `data:` frames, with the event kind as the SSE event name.
/// The stream continues until the client disconnects.
pub async fn stream<C, O, P>(
    State(state): State<AppState<C, O, P>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    C: Clock + Send + 'static,
    O: OutputDriver + Send + 'static,
    P: EventPublisher + Send + 'static,
{
    let event_rx = state.event_bus.subscribe();
    let event_stream = BroadcastStream::new(event_rx).filter_map(|result| match result {
        Ok(event) => match serde_json::to_value(&event) {
            Ok(json) => {
                let name = json["type"].as_str().unwrap_or("device_event").to_string();
                Some(Ok(Event::default().event(name).data(json.to_string())))
            }
            Err(err) => {
                tracing::warn!(%err, "failed to serialize event to JSON for SSE stream");
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(n)) => {
            tracing::warn!(
                skipped = n,
                "SSE subscriber lagged, some events were dropped"
            );
            None
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{ADMIN, test_state};
    use relayhub_app::hub::InboundMessage;
    use relayhub_domain::event::DeviceEventKind;

    #[tokio::test]
    async fn should_subscribe_to_event_bus_when_stream_created() {
        let (state, _) = test_state();
        let mut rx = state.event_bus.subscribe();

        let _sse_response = stream(State(state.clone())).await;
        assert_eq!(state.event_bus.receiver_count(), 2);

        state
            .lock_hub()
            .handle_message(&InboundMessage::new(ADMIN, "/lighton"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.device.as_deref(), Some("light"));
        assert_eq!(received.kind, DeviceEventKind::TurnedOn);
    }
}
