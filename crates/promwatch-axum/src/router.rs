//! Axum router wiring.
//!
//! Every route, including `/metrics` itself and unmatched paths, goes
//! through the instrumentation middleware.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops};

async fn index() -> &'static str {
    "promwatch!\n"
}

pub fn build_router(state: AppState) -> Router {
    let instrument = state.monitor().layer();
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
        .layer(instrument)
}
