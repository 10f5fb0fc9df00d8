//! Latency histogram bucket boundaries (seconds).

use crate::error::{MonitorError, Result};

/// Default latency buckets in seconds.
pub const DEFAULT_BUCKETS: [f64; 4] = [0.1, 0.3, 1.5, 10.5];

/// Validated, strictly ascending list of positive upper bounds.
///
/// The implicit `+Inf` bucket is not stored; renderers append it.
#[derive(Debug, Clone, PartialEq)]
pub struct Buckets(Vec<f64>);

impl Buckets {
    /// Validate and wrap a bucket list.
    ///
    /// Rejects empty lists, non-finite or non-positive bounds, and any pair
    /// that is not strictly ascending.
    pub fn new(bounds: impl Into<Vec<f64>>) -> Result<Self> {
        let bounds = bounds.into();
        if bounds.is_empty() {
            return Err(MonitorError::InvalidBuckets("bucket list must not be empty".into()));
        }
        for (i, b) in bounds.iter().enumerate() {
            if !b.is_finite() {
                return Err(MonitorError::InvalidBuckets(format!(
                    "bucket {i} is not finite: {b}"
                )));
            }
            if *b <= 0.0 {
                return Err(MonitorError::InvalidBuckets(format!(
                    "bucket {i} must be positive: {b}"
                )));
            }
        }
        if let Some(w) = bounds.windows(2).find(|w| w[0] >= w[1]) {
            return Err(MonitorError::InvalidBuckets(format!(
                "buckets must be strictly ascending: {} >= {}",
                w[0], w[1]
            )));
        }
        Ok(Self(bounds))
    }

    pub fn bounds(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the smallest bound `>= value`, or `None` when only `+Inf` fits.
    pub fn index_for(&self, value: f64) -> Option<usize> {
        self.0.iter().position(|b| value <= *b)
    }
}

impl Default for Buckets {
    fn default() -> Self {
        Self(DEFAULT_BUCKETS.to_vec())
    }
}
