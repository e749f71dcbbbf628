// src/services/retention.rs

use crate::config::DEFAULT_HISTORY_CAP;

/// Caps how many attempts are kept per (user, quiz).
///
/// Runs right before a new attempt is inserted, so it evicts until there is
/// room for one more: after the insert the pair holds at most `cap` attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRetentionPolicy {
    cap: usize,
}

impl Default for HistoryRetentionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}

impl HistoryRetentionPolicy {
    /// A cap below 1 is treated as 1.
    pub fn new(cap: usize) -> Self {
        Self { cap: cap.max(1) }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Removes the oldest entries of `existing` (sorted oldest first) while
    /// `existing.len() >= cap`, and returns them oldest first.
    pub fn enforce_cap<T>(&self, existing: &mut Vec<T>) -> Vec<T> {
        if existing.len() < self.cap {
            return Vec::new();
        }
        let excess = existing.len() - self.cap + 1;
        existing.drain(..excess).collect()
    }
}
