//! Top-level facade crate for promwatch.
//!
//! Re-exports core types and the axum integration so users can depend on a single crate.

pub mod core {
    pub use promwatch_core::*;
}

pub mod axum {
    pub use promwatch_axum::*;
}

pub use promwatch_axum::{DependencyChecker, Monitor};
pub use promwatch_core::{Buckets, DependencyStatus, MonitorError, DEFAULT_BUCKETS};
