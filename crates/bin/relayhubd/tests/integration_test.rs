//! End-to-end smoke tests for the full relayhubd stack.
//!
//! Each test wires the real hub, the virtual relay board, and the real axum
//! router, then exercises the HTTP layer via `tower::ServiceExt::oneshot`;
//! no TCP port is bound. Time is driven by a `ManualClock`.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::TimeDelta;
use http_body_util::BodyExt;
use relayhub_adapter_http_axum::router;
use relayhub_adapter_http_axum::state::AppState;
use relayhub_adapter_virtual::VirtualRelayBoard;
use relayhub_app::clock::ManualClock;
use relayhub_app::event_bus::InProcessEventBus;
use relayhub_app::hub::{ACCESS_DENIED, Hub, HubSettings};
use relayhub_domain::device::{Device, OutputHandle};
use tower::ServiceExt;

const ADMIN: &str = "123456789";

type TestState = AppState<Arc<ManualClock>, Arc<VirtualRelayBoard>, Arc<InProcessEventBus>>;

struct Stack {
    state: TestState,
    clock: Arc<ManualClock>,
    board: Arc<VirtualRelayBoard>,
}

impl Stack {
    fn new() -> Self {
        let clock = Arc::new(ManualClock::at_epoch_secs(0));
        let board = Arc::new(VirtualRelayBoard::new());
        let event_bus = Arc::new(InProcessEventBus::new(64));
        let devices = [
            ("light", 12),
            ("fan", 14),
            ("ac", 27),
            ("tv", 26),
            ("geyser", 25),
        ]
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
            Arc::clone(&board),
            Arc::clone(&event_bus),
        )
        .expect("default devices should be valid");

        Self {
            state: AppState::new(Arc::new(Mutex::new(hub)), event_bus),
            clock,
            board,
        }
    }

    async fn send(&self, sender: &str, text: &str) -> (StatusCode, Option<String>) {
        let body = serde_json::json!({ "sender": sender, "text": text });
        let response = router::build(self.state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/messages")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        if bytes.is_empty() {
            return (status, None);
        }
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json["reply"].as_str().map(str::to_string))
    }

    async fn command(&self, text: &str) -> Option<String> {
        self.send(ADMIN, text).await.1
    }

    async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router::build(self.state.clone())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn advance_secs(&self, secs: i64) {
        self.clock.advance(TimeDelta::seconds(secs));
    }

    fn tick(&self) {
        self.state.lock_hub().tick();
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let stack = Stack::new();
    let resp = router::build(stack.state.clone())
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_start_with_all_outputs_released() {
    let stack = Stack::new();
    for pin in [12, 14, 25, 26, 27] {
        assert_eq!(stack.board.level(OutputHandle::new(pin)), Some(false));
    }

    let (status, devices) = stack.get_json("/api/devices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(devices.as_array().unwrap().len(), 5);
}

// ---------------------------------------------------------------------------
// Command flows
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_switch_auto_off_fan_after_deadline() {
    let stack = Stack::new();

    assert_eq!(
        stack.command("/autooff fan 5").await.as_deref(),
        Some("fan will auto-off in 5 mins.")
    );
    assert_eq!(stack.board.asserted(), vec![OutputHandle::new(14)]);

    stack.advance_secs(100);
    assert_eq!(
        stack.command("/status fan").await.as_deref(),
        Some("fan: ON, 0.03 hrs")
    );

    stack.advance_secs(200);
    stack.tick();

    assert!(stack.board.asserted().is_empty());
    let (_, fan) = stack.get_json("/api/devices/fan").await;
    assert_eq!(fan["state"], "off");
    assert!(fan["auto_off_deadline"].is_null());
    let hours = fan["usage_hours"].as_f64().unwrap();
    assert!((hours - 300.0 / 3600.0).abs() < 1e-9);
}

#[tokio::test]
async fn should_deny_unauthorized_reset() {
    let stack = Stack::new();
    stack.command("/tvon").await;
    stack.advance_secs(3600);

    let (status, reply) = stack.send("987654321", "/reset").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply.as_deref(), Some(ACCESS_DENIED));
    assert_eq!(
        stack.command("/usage tv").await.as_deref(),
        Some("tv used for 1.00 hrs in last 24 hrs")
    );
}

#[tokio::test]
async fn should_repeat_reply_for_redundant_light_on() {
    let stack = Stack::new();

    assert_eq!(
        stack.command("/lighton").await.as_deref(),
        Some("light turned ON")
    );
    let (_, before) = stack.get_json("/api/devices/light").await;
    stack.advance_secs(60);
    assert_eq!(
        stack.command("/lighton").await.as_deref(),
        Some("light turned ON")
    );
    let (_, after) = stack.get_json("/api/devices/light").await;

    assert_eq!(before["activated_at"], after["activated_at"]);
    assert_eq!(stack.board.asserted(), vec![OutputHandle::new(12)]);
}

#[tokio::test]
async fn should_report_running_time_after_reset() {
    let stack = Stack::new();
    stack.command("/geyseron").await;
    stack.advance_secs(1800);
    stack.command("/reset").await;

    let status = stack.command("/status").await.unwrap();

    assert!(status.starts_with("Device Status & Usage:\n"));
    assert!(status.contains("geyser: ON, 0.50 hrs\n"));
}

#[tokio::test]
async fn should_reset_usage_after_one_period() {
    let stack = Stack::new();
    stack.command("/acon").await;
    stack.advance_secs(3600);
    stack.command("/acoff").await;

    stack.advance_secs(86_400 - 3600);
    stack.tick();

    assert_eq!(
        stack.command("/usage ac").await.as_deref(),
        Some("ac used for 0.00 hrs in last 24 hrs")
    );
}

#[tokio::test]
async fn should_ignore_lines_without_prefix() {
    let stack = Stack::new();
    let (status, reply) = stack.send(ADMIN, "lighton").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(reply, None);
    assert!(stack.board.asserted().is_empty());
}

#[tokio::test]
async fn should_answer_not_found_only_for_status() {
    let stack = Stack::new();
    assert_eq!(
        stack.command("/status heater").await.as_deref(),
        Some("Device not found.")
    );
    assert_eq!(stack.command("/heateron").await, None);
    assert_eq!(stack.command("/usage heater").await, None);
}

#[tokio::test]
async fn should_return_404_for_unknown_device_snapshot() {
    let stack = Stack::new();
    let (status, body) = stack.get_json("/api/devices/heater").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("heater"));
}
