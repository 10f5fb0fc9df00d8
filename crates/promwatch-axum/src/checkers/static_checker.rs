use async_trait::async_trait;

use promwatch_core::DependencyStatus;

use crate::dependency::DependencyChecker;

/// Always reports the same status. Useful for placeholders and demos.
pub struct StaticChecker {
    name: String,
    status: DependencyStatus,
}

impl StaticChecker {
    pub fn new(name: impl Into<String>, status: DependencyStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

#[async_trait]
impl DependencyChecker for StaticChecker {
    fn dependency_name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> DependencyStatus {
        self.status
    }
}
