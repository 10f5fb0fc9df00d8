//! The monitor: owns the metric store, the dependency scheduler, and the
//! request/dependency recording helpers.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::HeaderName;
use axum::middleware::{from_fn_with_state, FromFnLayer};

use promwatch_core::error::{MonitorError, Result};
use promwatch_core::{Buckets, DependencyStatus};

use crate::dependency::{DependencyChecker, DependencyScheduler, Registration, StatusPublisher};
use crate::middleware::{instrument_boxed, InstrumentFn};
use crate::obs::MonitorMetrics;

/// Response header read for the `errorMessage` label by default.
pub const DEFAULT_ERROR_MESSAGE_KEY: &str = "error-message";

/// Descriptive labels of one completed outbound dependency call.
#[derive(Debug, Clone, Copy)]
pub struct DependencyRequest<'a> {
    pub name: &'a str,
    /// Protocol, exported as the `type` label (e.g. `http`, `grpc`).
    pub protocol: &'a str,
    pub status: &'a str,
    pub method: &'a str,
    pub address: &'a str,
    pub is_error: bool,
    pub error_message: &'a str,
}

/// Labels of one served HTTP request.
#[derive(Debug, Clone, Copy)]
pub struct RequestLabels<'a> {
    pub status: u16,
    pub method: &'a str,
    pub addr: &'a str,
    pub error_message: &'a str,
}

impl RequestLabels<'_> {
    /// Anything outside 2xx/3xx counts as an error.
    pub fn is_error(&self) -> bool {
        self.status < 200 || self.status >= 400
    }
}

/// Layer returned by [`Monitor::layer`].
pub type InstrumentLayer = FromFnLayer<InstrumentFn, Arc<Monitor>, (State<Arc<Monitor>>, Request)>;

fn bool_label(v: bool) -> &'static str {
    if v {
        "true"
    } else {
        "false"
    }
}

pub struct Monitor {
    version: String,
    error_header_key: HeaderName,
    metrics: Arc<MonitorMetrics>,
    publisher: StatusPublisher,
    scheduler: DependencyScheduler,
}

impl Monitor {
    /// Build a monitor with its own metric store.
    ///
    /// Fails when `buckets` is empty, not strictly ascending, or holds a
    /// non-positive bound, and when `error_header_key` is not a valid header
    /// name.
    pub fn new(
        version: impl Into<String>,
        error_header_key: &str,
        buckets: impl Into<Vec<f64>>,
    ) -> Result<Self> {
        let buckets = Buckets::new(buckets)?;
        Self::with_metrics(version, error_header_key, Arc::new(MonitorMetrics::new(buckets)))
    }

    /// Build a monitor on top of an existing metric store.
    pub fn with_metrics(
        version: impl Into<String>,
        error_header_key: &str,
        metrics: Arc<MonitorMetrics>,
    ) -> Result<Self> {
        let error_header_key = HeaderName::from_bytes(error_header_key.as_bytes()).map_err(|e| {
            MonitorError::BadConfig(format!("invalid error header key {error_header_key:?}: {e}"))
        })?;
        let version = version.into();

        metrics.application_info.set(&[("version", version.as_str())], 1);

        let publisher = StatusPublisher::new(Arc::clone(&metrics));
        let scheduler = DependencyScheduler::new(publisher.clone());

        Ok(Self {
            version,
            error_header_key,
            metrics,
            publisher,
            scheduler,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn error_header_key(&self) -> &HeaderName {
        &self.error_header_key
    }

    pub fn metrics(&self) -> Arc<MonitorMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn publisher(&self) -> &StatusPublisher {
        &self.publisher
    }

    /// Start polling `checker` every `interval` (clamped to one second).
    /// Duplicate names are accepted; the most recent tick wins.
    pub fn add_dependency_checker(&self, checker: Arc<dyn DependencyChecker>, interval: Duration) {
        self.scheduler.add(checker, interval);
    }

    pub fn dependency_checkers(&self) -> Vec<Registration> {
        self.scheduler.registrations()
    }

    /// Publish a status directly, bypassing any schedule.
    pub fn publish(&self, name: &str, status: DependencyStatus) {
        self.publisher.publish(name, status);
    }

    /// Record one dependency call into `dependency_request_seconds`.
    pub fn collect_dependency_time(&self, req: &DependencyRequest<'_>, elapsed_seconds: f64) {
        self.metrics.dependency_request_seconds.observe(
            &[
                ("name", req.name),
                ("type", req.protocol),
                ("status", req.status),
                ("method", req.method),
                ("addr", req.address),
                ("isError", bool_label(req.is_error)),
                ("errorMessage", req.error_message),
            ],
            elapsed_seconds,
        );
    }

    /// Record one served request into `request_seconds`.
    pub fn collect_request(&self, req: &RequestLabels<'_>, elapsed_seconds: f64) {
        let status = req.status.to_string();
        self.metrics
            .request_seconds
            .observe(&request_label_set(req, &status), elapsed_seconds);
    }

    /// Add the body size of one served response to `response_size_bytes`.
    pub fn collect_response_size(&self, req: &RequestLabels<'_>, bytes: u64) {
        let status = req.status.to_string();
        self.metrics
            .response_size_bytes
            .add(&request_label_set(req, &status), bytes);
    }

    /// Request instrumentation layer bound to this monitor, for
    /// `Router::layer` or `Router::route_layer`.
    pub fn layer(self: &Arc<Self>) -> InstrumentLayer {
        from_fn_with_state(Arc::clone(self), instrument_boxed as InstrumentFn)
    }

    /// Prometheus text exposition of every family.
    pub fn render(&self) -> String {
        self.metrics.render()
    }

    /// Stop all dependency checker tasks.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
    }
}

fn request_label_set<'a>(req: &RequestLabels<'a>, status: &'a str) -> [(&'static str, &'a str); 6] {
    [
        ("type", "http"),
        ("status", status),
        ("method", req.method),
        ("addr", req.addr),
        ("isError", bool_label(req.is_error())),
        ("errorMessage", req.error_message),
    ]
}
