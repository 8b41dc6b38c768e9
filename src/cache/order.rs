//! Insertion Order Module
//!
//! Tracks the order in which keys were inserted or refreshed. The store uses
//! it to break ties between entries with the same `stored_at`.

use std::collections::VecDeque;

// == Insertion Order ==
/// Keys ordered by their last insertion.
///
/// - Front = most recently inserted
/// - Back = earliest inserted
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Marks a key as just inserted (moves it to the front).
    ///
    /// Reads never call this; only insertion refreshes a key's position.
    pub fn record(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Earliest First ==
    /// Iterates keys from earliest to latest insertion.
    pub fn earliest_first(&self) -> impl Iterator<Item = &String> {
        self.order.iter().rev()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
