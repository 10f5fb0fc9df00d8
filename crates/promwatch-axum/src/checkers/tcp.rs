use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;

use promwatch_core::DependencyStatus;

use crate::dependency::DependencyChecker;

/// Up when a TCP connection to `addr` opens within `timeout`.
pub struct TcpChecker {
    name: String,
    addr: String,
    timeout: Duration,
}

impl TcpChecker {
    pub fn new(name: impl Into<String>, addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            addr: addr.into(),
            timeout,
        }
    }
}

#[async_trait]
impl DependencyChecker for TcpChecker {
    fn dependency_name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> DependencyStatus {
        match tokio::time::timeout(self.timeout, TcpStream::connect(self.addr.as_str())).await {
            Ok(Ok(_)) => DependencyStatus::Up,
            Ok(Err(e)) => {
                tracing::debug!(dependency=%self.name, addr=%self.addr, error=%e, "tcp connect failed");
                DependencyStatus::Down
            }
            Err(_) => {
                tracing::debug!(dependency=%self.name, addr=%self.addr, timeout=?self.timeout, "tcp connect timed out");
                DependencyStatus::Down
            }
        }
    }
}
