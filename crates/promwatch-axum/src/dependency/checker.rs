use async_trait::async_trait;

use promwatch_core::DependencyStatus;

/// Something that can be named and asked whether it is reachable.
///
/// `check` has no error channel: any failure is reported as
/// [`DependencyStatus::Down`]. Implementations that perform I/O own their
/// timeouts; the scheduler waits for `check` to return before the next tick.
#[async_trait]
pub trait DependencyChecker: Send + Sync {
    fn dependency_name(&self) -> &str;
    async fn check(&self) -> DependencyStatus;
}
