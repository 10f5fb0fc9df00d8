//! promwatch demo server
//!
//! - `/`        : hello handler
//! - `/healthz` : liveness
//! - `/metrics` : request, response-size, dependency and app-info metrics
//!
//! Config is read from `promwatch.yaml`, or the path in `PROMWATCH_CONFIG`.

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use promwatch_core::error::{MonitorError, Result};
use promwatch_axum::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::var("PROMWATCH_CONFIG").unwrap_or_else(|_| "promwatch.yaml".into());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .map_err(|e| MonitorError::BadConfig(format!("server.listen must be a valid SocketAddr: {e}")))?;

    let state = app_state::AppState::new(&cfg)?;
    let monitor = state.monitor();
    let app = router::build_router(state);

    tracing::info!(%listen, version = monitor.version(), "promwatch starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| MonitorError::Internal(format!("failed to bind {listen}: {e}")))?;

    let served = axum::serve(listener, app)
        .await
        .map_err(|e| MonitorError::Internal(format!("server failed: {e}")));
    monitor.shutdown();
    served
}
