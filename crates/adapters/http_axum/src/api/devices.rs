//! JSON handlers for device snapshots.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use relayhub_app::hub::DeviceSnapshot;
use relayhub_app::ports::{Clock, EventPublisher, OutputDriver};

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<DeviceSnapshot>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<DeviceSnapshot>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/devices`
pub async fn list<C, O, P>(State(state): State<AppState<C, O, P>>) -> ListResponse
where
    C: Clock + Send + 'static,
    O: OutputDriver + Send + 'static,
    P: EventPublisher + Send + 'static,
{
    let devices = state.lock_hub().snapshot();
    ListResponse::Ok(Json(devices))
}

/// `GET /api/devices/{name}`
pub async fn get<C, O, P>(
    State(state): State<AppState<C, O, P>>,
    Path(name): Path<String>,
) -> Result<GetResponse, ApiError>
where
    C: Clock + Send + 'static,
    O: OutputDriver + Send + 'static,
    P: EventPublisher + Send + 'static,
{
    let device = state.lock_hub().device_snapshot(&name)?;
    Ok(GetResponse::Ok(Json(device)))
}
