//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
pub mod messages;
pub mod sse;

use axum::Router;
use axum::routing::{get, post};

use relayhub_app::ports::{Clock, EventPublisher, OutputDriver};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<C, O, P>() -> Router<AppState<C, O, P>>
where
    C: Clock + Send + 'static,
    O: OutputDriver + Send + 'static,
    P: EventPublisher + Send + 'static,
{
    Router::new()
        // Transport
        .route("/messages", post(messages::submit::<C, O, P>))
        // Devices
        .route("/devices", get(devices::list::<C, O, P>))
        .route("/devices/{name}", get(devices::get::<C, O, P>))
        // Events
        .route("/events/stream", get(sse::stream::<C, O, P>))
}
