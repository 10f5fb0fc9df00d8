//! Lightweight in-process metrics.
//!
//! Metrics are stored as atomics behind `DashMap` keys and rendered by the
//! `/metrics` handler in Prometheus text format.

pub mod metrics;

pub use metrics::{CounterVec, GaugeVec, HistogramSnapshot, HistogramVec, MonitorMetrics};
