//! Bounded per-object histories
//!
//! Both histories evict their oldest entry once full.

use nalgebra::Point2;
use std::collections::VecDeque;

/// Entries kept in a mass history
pub const MASS_HISTORY_CAPACITY: usize = 300;

/// Positions kept in a body trail
pub const TRAIL_CAPACITY: usize = 200;

/// Fixed-capacity FIFO
#[derive(Debug, Clone, PartialEq)]
pub struct Bounded<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> Bounded<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an entry, evicting the oldest if full
    pub fn push(&mut self, entry: T) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }
}

/// `(age, mass)` samples recorded once per step
pub type MassHistory = Bounded<(f64, f64)>;

/// Recent body positions, cleared whenever the body wraps
pub type Trail = Bounded<Point2<f64>>;

impl MassHistory {
    pub fn new() -> Self {
        Self::with_capacity(MASS_HISTORY_CAPACITY)
    }
}

impl Default for MassHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl Trail {
    pub fn new() -> Self {
        Self::with_capacity(TRAIL_CAPACITY)
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::new()
    }
}
