//! # relayhubd: relayhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialize logging
//! - Construct the output driver, event bus, and hub
//! - Drive the hub's tick from a tokio interval
//! - Build the axum router, injecting the shared hub
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use relayhub_adapter_http_axum::state::{AppState, SharedHub};
use relayhub_adapter_virtual::VirtualRelayBoard;
use relayhub_app::clock::SystemClock;
use relayhub_app::event_bus::InProcessEventBus;
use relayhub_app::hub::Hub;

type DaemonHub = SharedHub<SystemClock, VirtualRelayBoard, Arc<InProcessEventBus>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(256));

    // Hub
    let hub = Hub::new(
        config.hub_settings()?,
        config.build_devices()?,
        SystemClock,
        VirtualRelayBoard::new(),
        Arc::clone(&event_bus),
    )?;
    tracing::info!(devices = hub.registry().len(), "device registry ready");
    let hub: DaemonHub = Arc::new(Mutex::new(hub));

    // Tick loop
    let ticker = tokio::spawn(run_ticks(Arc::clone(&hub), config.tick_interval()));

    // HTTP
    let state = AppState::new(hub, event_bus);
    let app = relayhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "relayhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ticker.abort();
    tracing::info!("relayhubd stopped");
    Ok(())
}

async fn run_ticks(hub: DaemonHub, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let report = hub.lock().unwrap_or_else(PoisonError::into_inner).tick();
        if report.usage_reset || !report.switched_off.is_empty() {
            tracing::debug!(?report, "tick applied");
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
