//! Delayed state transitions with cancel-on-replace semantics.
//!
//! A [`TimerTable`] holds at most one pending deadline per key. Scheduling a
//! key that is already pending replaces the old deadline, so a stale
//! "return to idle" never fires after a newer attack.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
pub struct TimerTable<K> {
    pending: HashMap<K, DateTime<Utc>>,
}

impl<K> Default for TimerTable<K> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> TimerTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to fire `delay` after `now`, replacing any pending deadline.
    ///
    /// # Returns
    ///
    /// The replaced deadline, if one was pending
    pub fn schedule(&mut self, key: K, now: DateTime<Utc>, delay: Duration) -> Option<DateTime<Utc>> {
        self.pending.insert(key, now + delay)
    }

    pub fn cancel(&mut self, key: K) -> bool {
        self.pending.remove(&key).is_some()
    }

    pub fn is_pending(&self, key: K) -> bool {
        self.pending.contains_key(&key)
    }

    pub fn deadline(&self, key: K) -> Option<DateTime<Utc>> {
        self.pending.get(&key).copied()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.values().min().copied()
    }

    /// Remove and return every key due at `now`, earliest first.
    pub fn drain_due(&mut self, now: DateTime<Utc>) -> Vec<K> {
        let mut due: Vec<(DateTime<Utc>, K)> = self
            .pending
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(key, at)| (*at, *key))
            .collect();
        due.sort_by_key(|(at, _)| *at);
        for (_, key) in &due {
            self.pending.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
