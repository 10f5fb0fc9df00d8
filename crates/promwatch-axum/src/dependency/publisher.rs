use std::sync::Arc;

use promwatch_core::DependencyStatus;

use crate::obs::MonitorMetrics;

/// Writes dependency status into the `dependency_up{name}` gauge.
#[derive(Clone)]
pub struct StatusPublisher {
    metrics: Arc<MonitorMetrics>,
}

impl StatusPublisher {
    pub fn new(metrics: Arc<MonitorMetrics>) -> Self {
        Self { metrics }
    }

    /// Set the gauge for `name` to 1 (up) or 0 (down). Last write wins.
    pub fn publish(&self, name: &str, status: DependencyStatus) {
        self.metrics
            .dependency_up
            .set(&[("name", name)], status.gauge_value());
    }

    /// Last published status, `None` if `name` was never published.
    pub fn current(&self, name: &str) -> Option<DependencyStatus> {
        self.metrics
            .dependency_up
            .get(&[("name", name)])
            .map(|v| DependencyStatus::from(v == 1))
    }
}
