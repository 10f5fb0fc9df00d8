//! Request instrumentation middleware.
//!
//! Apply with [`Monitor::layer`] or
//! `axum::middleware::from_fn_with_state(monitor, instrument)`.
//! Mounted via `Router::layer` it sees every response including 404/405.
//! Matched routes are labelled with their route template; only unmatched
//! (fallback) requests fall back to the raw path.
//!
//! Bodies with a known length are recorded in `response_size_bytes`
//! immediately. Streamed bodies are counted frame by frame and recorded once
//! the body is finished or dropped.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, HttpBody},
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use futures_util::{future::BoxFuture, StreamExt};

use crate::monitor::{Monitor, RequestLabels};

/// Function-pointer form of [`instrument`], so the layer type is nameable.
pub type InstrumentFn = fn(State<Arc<Monitor>>, Request, Next) -> BoxFuture<'static, Response>;

pub(crate) fn instrument_boxed(
    state: State<Arc<Monitor>>,
    request: Request,
    next: Next,
) -> BoxFuture<'static, Response> {
    Box::pin(instrument(state, request, next))
}

/// Labels of a finished response, owned so they can outlive the handler.
struct SizeRecorder {
    monitor: Arc<Monitor>,
    status: u16,
    method: String,
    addr: String,
    error_message: String,
    bytes: u64,
}

impl SizeRecorder {
    fn labels(&self) -> RequestLabels<'_> {
        RequestLabels {
            status: self.status,
            method: &self.method,
            addr: &self.addr,
            error_message: &self.error_message,
        }
    }
}

impl Drop for SizeRecorder {
    fn drop(&mut self) {
        self.monitor.collect_response_size(&self.labels(), self.bytes);
    }
}

pub async fn instrument(State(monitor): State<Arc<Monitor>>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let addr = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;

    let elapsed = start.elapsed().as_secs_f64();
    let error_message = response
        .headers()
        .get(monitor.error_header_key())
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let mut recorder = SizeRecorder {
        monitor: Arc::clone(&monitor),
        status: response.status().as_u16(),
        method,
        addr,
        error_message,
        bytes: 0,
    };
    monitor.collect_request(&recorder.labels(), elapsed);

    if let Some(size) = response.body().size_hint().exact() {
        recorder.bytes = size;
        return response;
    }

    let (parts, body) = response.into_parts();
    let counted = body.into_data_stream().inspect(move |chunk| {
        if let Ok(bytes) = chunk {
            recorder.bytes += bytes.len() as u64;
        }
    });
    Response::from_parts(parts, Body::from_stream(counted))
}
