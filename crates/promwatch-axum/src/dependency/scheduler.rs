use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures_util::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use promwatch_core::DependencyStatus;

use super::{DependencyChecker, StatusPublisher};

/// Shortest accepted polling interval. Shorter requests are clamped.
pub const MIN_CHECK_INTERVAL: Duration = Duration::from_secs(1);

struct ScheduledCheck {
    name: String,
    interval: Duration,
    task: JoinHandle<()>,
}

/// Snapshot of one registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub id: u64,
    pub name: String,
    pub interval: Duration,
}

/// Registry of scheduled checkers:
/// - `registration id -> (name, interval, task)`
///
/// Names are not unique. Two registrations with the same name run
/// independently and race on the same gauge key.
pub struct DependencyScheduler {
    publisher: StatusPublisher,
    checks: DashMap<u64, ScheduledCheck>,
    seq: AtomicU64,
}

impl DependencyScheduler {
    pub fn new(publisher: StatusPublisher) -> Self {
        Self {
            publisher,
            checks: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Spawn a periodic task for `checker`. The first check runs immediately.
    ///
    /// Must be called from within a tokio runtime; outside one the checker
    /// is logged and not scheduled.
    pub fn add(&self, checker: Arc<dyn DependencyChecker>, interval: Duration) {
        let name = checker.dependency_name().to_string();
        let interval = if interval < MIN_CHECK_INTERVAL {
            tracing::warn!(dependency=%name, ?interval, min=?MIN_CHECK_INTERVAL, "check interval below minimum, clamping");
            MIN_CHECK_INTERVAL
        } else {
            interval
        };

        let rt = match tokio::runtime::Handle::try_current() {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!(dependency=%name, error=%e, "no tokio runtime, dependency checker not scheduled");
                return;
            }
        };

        let task = rt.spawn(run_checks(checker, interval, self.publisher.clone()));
        let id = self.seq.fetch_add(1, Ordering::Relaxed);
        tracing::info!(dependency=%name, id, ?interval, "dependency checker scheduled");
        self.checks.insert(id, ScheduledCheck { name, interval, task });
    }

    pub fn registrations(&self) -> Vec<Registration> {
        let mut out: Vec<Registration> = self
            .checks
            .iter()
            .map(|e| Registration {
                id: *e.key(),
                name: e.value().name.clone(),
                interval: e.value().interval,
            })
            .collect();
        out.sort_by_key(|r| r.id);
        out
    }

    /// Stop every scheduled task. Last published values stay in the gauge.
    pub fn shutdown(&self) {
        let ids: Vec<u64> = self.checks.iter().map(|e| *e.key()).collect();
        for id in ids {
            if let Some((_, check)) = self.checks.remove(&id) {
                check.task.abort();
                tracing::debug!(dependency=%check.name, id, "dependency checker stopped");
            }
        }
    }
}

impl Drop for DependencyScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One registration's loop. Ticks never overlap: a slow check delays the
/// next tick instead of running concurrently with it.
async fn run_checks(checker: Arc<dyn DependencyChecker>, interval: Duration, publisher: StatusPublisher) {
    let mut tick = tokio::time::interval(interval);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tick.tick().await;

        let name = checker.dependency_name();
        let status = match AssertUnwindSafe(checker.check()).catch_unwind().await {
            Ok(status) => status,
            Err(_) => {
                tracing::warn!(dependency=%name, "dependency check panicked, reporting DOWN");
                DependencyStatus::Down
            }
        };

        tracing::debug!(dependency=%name, %status, "dependency checked");
        publisher.publish(name, status);
    }
}
