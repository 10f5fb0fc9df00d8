use serde::Deserialize;
use promwatch_core::error::{MonitorError, Result};
use promwatch_core::{Buckets, DependencyStatus, DEFAULT_BUCKETS};

use crate::dependency::MIN_CHECK_INTERVAL;
use crate::monitor::DEFAULT_ERROR_MESSAGE_KEY;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub monitor: MonitorSection,

    #[serde(default)]
    pub dependencies: Vec<DependencyConfig>,
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MonitorError::BadConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.monitor.validate()?;
        for dep in &self.dependencies {
            dep.validate()?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    #[serde(default = "default_app_version")]
    pub app_version: String,

    #[serde(default = "default_error_header_key")]
    pub error_header_key: String,

    #[serde(default = "default_buckets")]
    pub buckets: Vec<f64>,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            app_version: default_app_version(),
            error_header_key: default_error_header_key(),
            buckets: default_buckets(),
        }
    }
}

impl MonitorSection {
    pub fn validate(&self) -> Result<()> {
        Buckets::new(self.buckets.clone())?;
        if self.error_header_key.is_empty() {
            return Err(MonitorError::BadConfig(
                "monitor.error_header_key must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// TCP connect check against `addr`.
    Tcp,
    /// Fixed `status`, never touches the network.
    Static,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyConfig {
    pub name: String,
    pub kind: DependencyKind,

    #[serde(default)]
    pub addr: Option<String>,

    #[serde(default)]
    pub status: Option<DependencyStatus>,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl DependencyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MonitorError::BadConfig("dependency name must not be empty".into()));
        }
        let min_ms = MIN_CHECK_INTERVAL.as_millis() as u64;
        if self.interval_ms < min_ms {
            return Err(MonitorError::BadConfig(format!(
                "dependency {}: interval_ms must be at least {min_ms}",
                self.name
            )));
        }
        if !(1..=60000).contains(&self.timeout_ms) {
            return Err(MonitorError::BadConfig(format!(
                "dependency {}: timeout_ms must be between 1 and 60000",
                self.name
            )));
        }
        match self.kind {
            DependencyKind::Tcp if self.addr.is_none() => Err(MonitorError::BadConfig(format!(
                "dependency {}: kind tcp requires addr",
                self.name
            ))),
            DependencyKind::Static if self.status.is_none() => Err(MonitorError::BadConfig(format!(
                "dependency {}: kind static requires status",
                self.name
            ))),
            _ => Ok(()),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}
fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").into()
}
fn default_error_header_key() -> String {
    DEFAULT_ERROR_MESSAGE_KEY.into()
}
fn default_buckets() -> Vec<f64> {
    DEFAULT_BUCKETS.to_vec()
}
fn default_interval_ms() -> u64 {
    30000
}
fn default_timeout_ms() -> u64 {
    2000
}
