//! Dependency health: checker capability, per-checker schedule, and the
//! status publisher feeding `dependency_up`.

pub mod checker;
pub mod publisher;
pub mod scheduler;

pub use checker::DependencyChecker;
pub use publisher::StatusPublisher;
pub use scheduler::{DependencyScheduler, Registration, MIN_CHECK_INTERVAL};
