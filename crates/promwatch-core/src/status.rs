//! Dependency health status.

use std::fmt;

use serde::Deserialize;

/// Binary health of one dependency. There is no "unknown" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStatus {
    Up,
    Down,
}

impl DependencyStatus {
    /// Gauge value exposed for this status (`1` up, `0` down).
    pub fn gauge_value(self) -> i64 {
        match self {
            DependencyStatus::Up => 1,
            DependencyStatus::Down => 0,
        }
    }
}

impl From<bool> for DependencyStatus {
    fn from(up: bool) -> Self {
        if up {
            DependencyStatus::Up
        } else {
            DependencyStatus::Down
        }
    }
}

impl fmt::Display for DependencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyStatus::Up => f.write_str("UP"),
            DependencyStatus::Down => f.write_str("DOWN"),
        }
    }
}
