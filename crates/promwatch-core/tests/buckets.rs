#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use promwatch_core::{Buckets, DependencyStatus, DEFAULT_BUCKETS};

#[test]
fn ascending_positive_buckets_are_accepted() {
    let b = Buckets::new(vec![0.005, 0.01, 0.25, 1.0, 30.0]).expect("must be valid");
    assert_eq!(b.len(), 5);
    assert_eq!(b.bounds()[2], 0.25);
}

#[test]
fn default_buckets_validate() {
    let b = Buckets::new(DEFAULT_BUCKETS.to_vec()).expect("defaults must be valid");
    assert_eq!(b, Buckets::default());
}

#[test]
fn empty_buckets_are_rejected() {
    let err = Buckets::new(Vec::<f64>::new()).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_BUCKETS");
}

#[test]
fn non_ascending_buckets_are_rejected() {
    assert!(Buckets::new(vec![0.1, 0.3, 0.2]).is_err());
    // equal neighbours are not strictly ascending
    assert!(Buckets::new(vec![0.1, 0.1]).is_err());
}

#[test]
fn non_positive_or_non_finite_buckets_are_rejected() {
    assert!(Buckets::new(vec![0.0, 1.0]).is_err());
    assert!(Buckets::new(vec![-1.0, 1.0]).is_err());
    assert!(Buckets::new(vec![0.5, f64::INFINITY]).is_err());
    assert!(Buckets::new(vec![f64::NAN]).is_err());
}

#[test]
fn index_for_picks_smallest_bound_not_below_value() {
    let b = Buckets::default(); // 0.1, 0.3, 1.5, 10.5
    assert_eq!(b.index_for(0.05), Some(0));
    assert_eq!(b.index_for(0.1), Some(0));
    assert_eq!(b.index_for(0.25), Some(1));
    assert_eq!(b.index_for(10.5), Some(3));
    assert_eq!(b.index_for(11.0), None);
}

#[test]
fn status_gauge_values() {
    assert_eq!(DependencyStatus::Up.gauge_value(), 1);
    assert_eq!(DependencyStatus::Down.gauge_value(), 0);
    assert_eq!(DependencyStatus::from(false), DependencyStatus::Down);
    assert_eq!(DependencyStatus::Up.to_string(), "UP");
}
