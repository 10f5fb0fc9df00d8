//! promwatch core: framework-agnostic types shared by the monitor crates.
//!
//! This crate defines the dependency status model, histogram bucket
//! validation, and the error surface. It intentionally carries no runtime or
//! HTTP dependencies so it can be reused by other integrations.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `MonitorError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod buckets;
pub mod error;
pub mod status;

pub use buckets::{Buckets, DEFAULT_BUCKETS};
pub use error::{ErrorCode, MonitorError, Result};
pub use status::DependencyStatus;
