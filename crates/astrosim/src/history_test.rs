use nalgebra::Point2;

use crate::history::{Bounded, MASS_HISTORY_CAPACITY, MassHistory, TRAIL_CAPACITY, Trail};

#[test]
fn test_evicts_oldest_when_full() {
    let mut history = Bounded::with_capacity(3);
    for i in 0..5 {
        history.push(i);
    }

    assert_eq!(history.len(), 3);
    assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    assert_eq!(history.latest(), Some(&4));
}

#[test]
fn test_default_capacities() {
    assert_eq!(MassHistory::new().capacity(), MASS_HISTORY_CAPACITY);
    assert_eq!(Trail::new().capacity(), TRAIL_CAPACITY);
}

#[test]
fn test_mass_history_stays_bounded() {
    let mut history = MassHistory::new();
    for i in 0..1000 {
        history.push((i as f64, 10.0));
    }
    assert_eq!(history.len(), 300);
    assert_eq!(history.iter().next(), Some(&(700.0, 10.0)));
}

#[test]
fn test_clear_trail() {
    let mut trail = Trail::new();
    trail.push(Point2::new(1.0, 2.0));
    trail.clear();
    assert!(trail.is_empty());
}

#[test]
fn test_zero_capacity_keeps_nothing() {
    let mut history = Bounded::with_capacity(0);
    history.push(1);
    assert!(history.is_empty());
}
