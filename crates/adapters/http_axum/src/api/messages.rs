//! Message transport: one inbound text message per request.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use relayhub_app::hub::InboundMessage;
use relayhub_app::ports::{Clock, EventPublisher, OutputDriver};

use crate::state::AppState;

/// Request body for submitting a message.
#[derive(Debug, Deserialize)]
pub struct SubmitMessageRequest {
    pub sender: String,
    pub text: String,
}

/// Reply body.
#[derive(Debug, Serialize)]
pub struct ReplyBody {
    pub reply: String,
}

/// Possible responses from the submit endpoint.
pub enum SubmitResponse {
    Reply(Json<ReplyBody>),
    NoReply,
}

impl IntoResponse for SubmitResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Reply(json) => json.into_response(),
            Self::NoReply => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `POST /api/messages`
///
/// The reply, including an access denial, is returned as the body. Lines
/// the hub ignores produce `204 No Content`.
pub async fn submit<C, O, P>(
    State(state): State<AppState<C, O, P>>,
    Json(req): Json<SubmitMessageRequest>,
) -> SubmitResponse
where
    C: Clock + Send + 'static,
    O: OutputDriver + Send + 'static,
    P: EventPublisher + Send + 'static,
{
    let message = InboundMessage::new(req.sender, req.text);
    let reply = state.lock_hub().handle_message(&message);
    match reply {
        Some(reply) => SubmitResponse::Reply(Json(ReplyBody { reply: reply.text })),
        None => SubmitResponse::NoReply,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router;
    use crate::state::test_support::{ADMIN, test_state};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use relayhub_app::hub::ACCESS_DENIED;
    use tower::ServiceExt;

    fn post(sender: &str, text: &str) -> Request<Body> {
        let body = serde_json::json!({ "sender": sender, "text": text });
        Request::builder()
            .method("POST")
            .uri("/api/messages")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_return_reply_for_command() {
        let (state, _) = test_state();
        let app = router::build(state.clone());

        let response = app.oneshot(post(ADMIN, "/lighton")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["reply"], "light turned ON");
        let light = state.lock_hub().device_snapshot("light").unwrap();
        assert!(light.state.is_on());
    }

    #[tokio::test]
    async fn should_return_no_content_for_ignored_line() {
        let (state, _) = test_state();
        let app = router::build(state);

        let response = app.oneshot(post(ADMIN, "hello")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn should_return_denial_for_unauthorized_sender() {
        let (state, _) = test_state();
        let app = router::build(state);

        let response = app.oneshot(post("987", "/reset")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["reply"], ACCESS_DENIED);
    }

    #[tokio::test]
    async fn should_reject_malformed_body() {
        let (state, _) = test_state();
        let app = router::build(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/messages")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"sender\": 1}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
