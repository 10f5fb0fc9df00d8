#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use promwatch_axum::checkers::StaticChecker;
use promwatch_axum::{DependencyChecker, Monitor, DEFAULT_ERROR_MESSAGE_KEY};
use promwatch_core::{DependencyStatus, DEFAULT_BUCKETS};

/// Reports `up` and counts how many times it was asked.
struct Counting {
    name: &'static str,
    up: AtomicBool,
    calls: AtomicUsize,
}

impl Counting {
    fn new(name: &'static str, up: bool) -> Arc<Self> {
        Arc::new(Self {
            name,
            up: AtomicBool::new(up),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DependencyChecker for Counting {
    fn dependency_name(&self) -> &str {
        self.name
    }

    async fn check(&self) -> DependencyStatus {
        self.calls.fetch_add(1, Ordering::SeqCst);
        DependencyStatus::from(self.up.load(Ordering::SeqCst))
    }
}

/// Never returns from its first check.
struct Hanging {
    entered: AtomicUsize,
}

#[async_trait]
impl DependencyChecker for Hanging {
    fn dependency_name(&self) -> &str {
        "hang"
    }

    async fn check(&self) -> DependencyStatus {
        self.entered.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        DependencyStatus::Up
    }
}

struct Panicking {
    calls: AtomicUsize,
}

#[async_trait]
impl DependencyChecker for Panicking {
    fn dependency_name(&self) -> &str {
        "boom"
    }

    async fn check(&self) -> DependencyStatus {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("checker exploded");
    }
}

fn monitor() -> Monitor {
    Monitor::new("v1.0.0", DEFAULT_ERROR_MESSAGE_KEY, DEFAULT_BUCKETS.to_vec()).expect("valid monitor")
}

#[tokio::test(start_paused = true)]
async fn down_checker_is_published_within_one_interval_and_stays_down() {
    let m = monitor();
    let dep = Counting::new("fake-dependency", false);
    m.add_dependency_checker(dep.clone(), Duration::from_secs(30));

    sleep(Duration::from_secs(1)).await;
    assert_eq!(m.publisher().current("fake-dependency"), Some(DependencyStatus::Down));

    sleep(Duration::from_secs(90)).await;
    assert_eq!(m.publisher().current("fake-dependency"), Some(DependencyStatus::Down));
    assert_eq!(dep.calls(), 4); // t = 0, 30, 60, 90
    assert!(m.render().contains("dependency_up{name=\"fake-dependency\"} 0"));
}

#[tokio::test(start_paused = true)]
async fn flip_to_up_is_visible_by_next_tick() {
    let m = monitor();
    let dep = Counting::new("db", false);
    m.add_dependency_checker(dep.clone(), Duration::from_secs(2));

    sleep(Duration::from_millis(500)).await;
    assert_eq!(m.publisher().current("db"), Some(DependencyStatus::Down));

    dep.up.store(true, Ordering::SeqCst);
    sleep(Duration::from_secs(2)).await; // past the t = 2 tick
    assert_eq!(m.publisher().current("db"), Some(DependencyStatus::Up));
}

#[tokio::test(start_paused = true)]
async fn duplicate_names_are_last_writer_wins() {
    let m = monitor();
    m.add_dependency_checker(
        Arc::new(StaticChecker::new("db", DependencyStatus::Up)),
        Duration::from_secs(2),
    );
    m.add_dependency_checker(
        Arc::new(StaticChecker::new("db", DependencyStatus::Down)),
        Duration::from_secs(3),
    );
    assert_eq!(m.dependency_checkers().len(), 2);

    sleep(Duration::from_millis(2500)).await; // up ticked at 2
    assert_eq!(m.publisher().current("db"), Some(DependencyStatus::Up));

    sleep(Duration::from_secs(1)).await; // down ticked at 3
    assert_eq!(m.publisher().current("db"), Some(DependencyStatus::Down));

    sleep(Duration::from_secs(1)).await; // up ticked at 4
    assert_eq!(m.publisher().current("db"), Some(DependencyStatus::Up));
}

#[tokio::test(start_paused = true)]
async fn hanging_checker_only_delays_itself() {
    let m = monitor();
    let hang = Arc::new(Hanging {
        entered: AtomicUsize::new(0),
    });
    let fast = Counting::new("fast", true);
    let slow = Counting::new("slow", true);

    m.add_dependency_checker(hang.clone(), Duration::from_secs(1));
    m.add_dependency_checker(fast.clone(), Duration::from_secs(1));
    m.add_dependency_checker(slow.clone(), Duration::from_secs(2));

    sleep(Duration::from_millis(5500)).await;

    assert_eq!(hang.entered.load(Ordering::SeqCst), 1);
    assert_eq!(fast.calls(), 6); // t = 0..=5
    assert_eq!(slow.calls(), 3); // t = 0, 2, 4
    assert_eq!(m.publisher().current("hang"), None);
    assert_eq!(m.publisher().current("fast"), Some(DependencyStatus::Up));
}

#[tokio::test(start_paused = true)]
async fn panicking_checker_reports_down_and_keeps_running() {
    let m = monitor();
    let boom = Arc::new(Panicking {
        calls: AtomicUsize::new(0),
    });
    m.add_dependency_checker(boom.clone(), Duration::from_secs(1));

    sleep(Duration::from_millis(2500)).await;
    assert_eq!(boom.calls.load(Ordering::SeqCst), 3);
    assert_eq!(m.publisher().current("boom"), Some(DependencyStatus::Down));
}

#[tokio::test(start_paused = true)]
async fn short_interval_is_clamped_to_minimum() {
    let m = monitor();
    let dep = Counting::new("tight", true);
    m.add_dependency_checker(dep.clone(), Duration::from_millis(10));

    let regs = m.dependency_checkers();
    assert_eq!(regs.len(), 1);
    assert_eq!(regs[0].name, "tight");
    assert_eq!(regs[0].interval, Duration::from_secs(1));

    sleep(Duration::from_millis(2500)).await;
    assert_eq!(dep.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_all_schedules() {
    let m = monitor();
    let dep = Counting::new("db", true);
    m.add_dependency_checker(dep.clone(), Duration::from_secs(1));

    sleep(Duration::from_millis(1500)).await;
    assert_eq!(dep.calls(), 2);

    m.shutdown();
    assert!(m.dependency_checkers().is_empty());

    sleep(Duration::from_secs(10)).await;
    assert_eq!(dep.calls(), 2);
    // last value is kept
    assert_eq!(m.publisher().current("db"), Some(DependencyStatus::Up));
}

#[test]
fn registering_outside_a_runtime_does_not_panic() {
    let m = monitor();
    m.add_dependency_checker(
        Arc::new(StaticChecker::new("db", DependencyStatus::Up)),
        Duration::from_secs(1),
    );
    assert!(m.dependency_checkers().is_empty());
}
