//! promwatch axum integration.
//!
//! This crate wires the metric store, the dependency scheduler, and the
//! request instrumentation middleware into an axum stack. It is consumed by
//! the demo binary (`main.rs`), by integration tests, and by services that
//! embed a [`Monitor`].

pub mod app_state;
pub mod checkers;
pub mod config;
pub mod dependency;
pub mod middleware;
pub mod monitor;
pub mod obs;
pub mod ops;
pub mod router;

pub use dependency::{DependencyChecker, StatusPublisher};
pub use monitor::{DependencyRequest, Monitor, RequestLabels, DEFAULT_ERROR_MESSAGE_KEY};
