//! Shared application state for the promwatch server.

use std::sync::Arc;
use std::time::Duration;

use promwatch_core::error::Result;

use crate::checkers;
use crate::config::MonitorConfig;
use crate::monitor::Monitor;

#[derive(Clone)]
pub struct AppState {
    monitor: Arc<Monitor>,
}

impl AppState {
    /// Build the monitor and schedule every configured dependency.
    /// Must run inside a tokio runtime so checker tasks can be spawned.
    pub fn new(cfg: &MonitorConfig) -> Result<Self> {
        let m = &cfg.monitor;
        let monitor = Monitor::new(m.app_version.clone(), &m.error_header_key, m.buckets.clone())?;

        for dep in &cfg.dependencies {
            monitor.add_dependency_checker(
                checkers::from_config(dep),
                Duration::from_millis(dep.interval_ms),
            );
        }

        Ok(Self {
            monitor: Arc::new(monitor),
        })
    }

    pub fn monitor(&self) -> Arc<Monitor> {
        Arc::clone(&self.monitor)
    }
}
