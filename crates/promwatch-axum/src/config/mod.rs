//! Monitor config loader (strict parsing).

pub mod schema;

use std::fs;

use promwatch_core::error::{MonitorError, Result};

pub use schema::{DependencyConfig, DependencyKind, MonitorConfig, MonitorSection, ServerSection};

pub fn load_from_file(path: &str) -> Result<MonitorConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MonitorError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<MonitorConfig> {
    let cfg: MonitorConfig = serde_yaml::from_str(s)
        .map_err(|e| MonitorError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
