//! In-process metric store for the monitor.
//!
//! Counter/gauge/histogram vectors with dynamic labels backed by `DashMap`.
//! Labels are flattened into sorted key vectors to keep deterministic
//! ordering. Every per-key update goes through atomics, so concurrent writers
//! (scheduler tasks and request handlers) never need an outer lock.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use promwatch_core::Buckets;

type LabelKey = Vec<(String, String)>;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for a label set, if it was ever touched.
    pub fn get(&self, labels: &[(&str, &str)]) -> Option<u64> {
        self.map
            .get(&label_key(labels))
            .map(|c| c.value().load(Ordering::Relaxed))
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", name, help);
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(r.key()), val);
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    /// Overwrite the value for a label set. Last writer wins.
    pub fn set(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicI64::new(0));
        gauge.store(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Option<i64> {
        self.map
            .get(&label_key(labels))
            .map(|g| g.value().load(Ordering::Relaxed))
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", name, help);
        let _ = writeln!(out, "# TYPE {} gauge", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(r.key()), val);
        }
    }
}

/// f64 accumulator stored as raw bits.
#[derive(Default)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn add(&self, v: f64) {
        let mut cur = self.0.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(cur) + v).to_bits();
            match self
                .0
                .compare_exchange_weak(cur, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => cur = actual,
            }
        }
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }
}

struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicF64,
    /// Non-cumulative hits per bound; cumulated at render time.
    buckets: Vec<AtomicU64>,
}

impl AtomicHistogram {
    fn new(n: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicF64::default(),
            buckets: (0..n).map(|_| AtomicU64::new(0)).collect(),
        }
    }
}

/// Point-in-time copy of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSnapshot {
    pub count: u64,
    pub sum: f64,
    /// Cumulative counts, one per configured bound (`+Inf` equals `count`).
    pub cumulative: Vec<u64>,
}

pub struct HistogramVec {
    buckets: Buckets,
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    pub fn new(buckets: Buckets) -> Self {
        Self {
            buckets,
            map: DashMap::new(),
        }
    }

    pub fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    /// Observe a value in seconds.
    pub fn observe(&self, labels: &[(&str, &str)], seconds: f64) {
        let n = self.buckets.len();
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicHistogram::new(n));

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.add(seconds);

        if let Some(i) = self.buckets.index_for(seconds) {
            if let Some(b) = hist.buckets.get(i) {
                b.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn snapshot(&self, labels: &[(&str, &str)]) -> Option<HistogramSnapshot> {
        let hist = self.map.get(&label_key(labels))?;
        let mut acc = 0;
        let cumulative = hist
            .buckets
            .iter()
            .map(|b| {
                acc += b.load(Ordering::Relaxed);
                acc
            })
            .collect();
        Some(HistogramSnapshot {
            count: hist.count.load(Ordering::Relaxed),
            sum: hist.sum.load(),
            cumulative,
        })
    }

    /// Render in Prometheus text exposition format (unit: seconds).
    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", name, help);
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for r in self.map.iter() {
            let labels = label_str(r.key());
            let hist = r.value();
            let prefix = if labels.is_empty() {
                String::new()
            } else {
                format!("{},", labels)
            };

            let mut cumulative = 0;
            for (le, hits) in self.buckets.bounds().iter().zip(hist.buckets.iter()) {
                cumulative += hits.load(Ordering::Relaxed);
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, cumulative);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);
            let _ = writeln!(out, "{}_sum{{{}}} {}", name, labels, hist.sum.load());
            let _ = writeln!(out, "{}_count{{{}}} {}", name, labels, count);
        }
    }
}

/// Every metric family the monitor exposes.
pub struct MonitorMetrics {
    pub request_seconds: HistogramVec,
    pub response_size_bytes: CounterVec,
    pub dependency_up: GaugeVec,
    pub dependency_request_seconds: HistogramVec,
    pub application_info: GaugeVec,
}

impl MonitorMetrics {
    /// Both latency histograms share one bucket layout.
    pub fn new(buckets: Buckets) -> Self {
        Self {
            request_seconds: HistogramVec::new(buckets.clone()),
            response_size_bytes: CounterVec::default(),
            dependency_up: GaugeVec::default(),
            dependency_request_seconds: HistogramVec::new(buckets),
            application_info: GaugeVec::default(),
        }
    }

    /// Render all families.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.request_seconds.render(
            "request_seconds",
            "records in a histogram the number of http requests and their duration in seconds",
            &mut out,
        );
        self.response_size_bytes.render(
            "response_size_bytes",
            "counts the size of each http response",
            &mut out,
        );
        self.dependency_up.render(
            "dependency_up",
            "records if a dependency is up or down. 1 for up, 0 for down",
            &mut out,
        );
        self.dependency_request_seconds.render(
            "dependency_request_seconds",
            "records in a histogram the number of requests of a dependency and their duration in seconds",
            &mut out,
        );
        self.application_info.render(
            "application_info",
            "static information about the application",
            &mut out,
        );
        out
    }
}

impl Default for MonitorMetrics {
    fn default() -> Self {
        Self::new(Buckets::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_set_overwrites() {
        let g = GaugeVec::default();
        g.set(&[("name", "db")], 1);
        g.set(&[("name", "db")], 0);
        assert_eq!(g.get(&[("name", "db")]), Some(0));
        assert_eq!(g.get(&[("name", "cache")]), None);
    }

    #[test]
    fn label_order_does_not_split_series() {
        let c = CounterVec::default();
        c.add(&[("a", "1"), ("b", "2")], 3);
        c.add(&[("b", "2"), ("a", "1")], 4);
        assert_eq!(c.get(&[("a", "1"), ("b", "2")]), Some(7));
    }

    #[test]
    fn histogram_renders_cumulative_buckets() {
        let h = HistogramVec::new(Buckets::default());
        h.observe(&[("name", "db")], 0.25);
        h.observe(&[("name", "db")], 20.0);

        let mut out = String::new();
        h.render("lat", "help", &mut out);
        assert!(out.contains("lat_bucket{name=\"db\",le=\"0.1\"} 0"));
        assert!(out.contains("lat_bucket{name=\"db\",le=\"0.3\"} 1"));
        assert!(out.contains("lat_bucket{name=\"db\",le=\"10.5\"} 1"));
        assert!(out.contains("lat_bucket{name=\"db\",le=\"+Inf\"} 2"));
        assert!(out.contains("lat_count{name=\"db\"} 2"));
        assert!(out.contains("lat_sum{name=\"db\"} 20.25"));
    }

    #[test]
    fn label_values_are_escaped() {
        let g = GaugeVec::default();
        g.set(&[("version", "v\"1\"")], 1);
        let mut out = String::new();
        g.render("application_info", "help", &mut out);
        assert!(out.contains("application_info{version=\"v\\\"1\\\"\"} 1"));
    }
}
