//! Built-in dependency checkers.

pub mod static_checker;
pub mod tcp;

use std::sync::Arc;
use std::time::Duration;

use promwatch_core::DependencyStatus;

use crate::config::{DependencyConfig, DependencyKind};
use crate::dependency::DependencyChecker;

pub use static_checker::StaticChecker;
pub use tcp::TcpChecker;

/// Build the checker described by a (validated) config entry.
pub fn from_config(dep: &DependencyConfig) -> Arc<dyn DependencyChecker> {
    match dep.kind {
        DependencyKind::Tcp => Arc::new(TcpChecker::new(
            dep.name.clone(),
            dep.addr.clone().unwrap_or_default(),
            Duration::from_millis(dep.timeout_ms),
        )),
        DependencyKind::Static => Arc::new(StaticChecker::new(
            dep.name.clone(),
            dep.status.unwrap_or(DependencyStatus::Down),
        )),
    }
}
