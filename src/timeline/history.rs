//! Linear undo log over `(deliveries, connections)`.
//!
//! The log always holds at least one snapshot and `pointer` always indexes
//! into it. Recording after an undo discards everything past the pointer.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::model::{Connection, Delivery};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// An immutable copy of the schedule, with a structural key for cheap
/// duplicate detection.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub deliveries: Vec<Delivery>,
    pub connections: Vec<Connection>,
    key: u64,
}

impl Snapshot {
    pub fn capture(deliveries: &[Delivery], connections: &[Connection]) -> Self {
        Self {
            deliveries: deliveries.to_vec(),
            connections: connections.to_vec(),
            key: structural_key(deliveries, connections),
        }
    }

    pub fn key(&self) -> u64 {
        self.key
    }

    fn matches(&self, deliveries: &[Delivery], connections: &[Connection]) -> bool {
        self.key == structural_key(deliveries, connections)
            && self.deliveries == deliveries
            && self.connections == connections
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.deliveries == other.deliveries
            && self.connections == other.connections
    }
}

fn structural_key(deliveries: &[Delivery], connections: &[Connection]) -> u64 {
    let mut hasher = DefaultHasher::new();
    deliveries.hash(&mut hasher);
    connections.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: Vec<Snapshot>,
    pointer: usize,
    limit: usize,
    /// Set while an undone snapshot is being applied; `record` is ignored.
    restoring: bool,
}

impl HistoryLog {
    pub fn new(deliveries: &[Delivery], connections: &[Connection], limit: usize) -> Self {
        Self {
            entries: vec![Snapshot::capture(deliveries, connections)],
            pointer: 0,
            limit: limit.max(1),
            restoring: false,
        }
    }

    /// Forget everything and start over from the given state.
    pub fn reset(&mut self, deliveries: &[Delivery], connections: &[Connection]) {
        self.entries = vec![Snapshot::capture(deliveries, connections)];
        self.pointer = 0;
        self.restoring = false;
    }

    /// Append the state unless it equals the current entry. Returns true when
    /// an entry was added.
    pub fn record(&mut self, deliveries: &[Delivery], connections: &[Connection]) -> bool {
        if self.restoring {
            log::debug!("history: record suppressed while restoring");
            return false;
        }
        if self.entries[self.pointer].matches(deliveries, connections) {
            return false;
        }
        self.entries.truncate(self.pointer + 1);
        self.entries.push(Snapshot::capture(deliveries, connections));
        self.pointer += 1;
        self.enforce_limit();
        true
    }

    /// Step back one entry and return it for the caller to apply. Until
    /// [`settle`](Self::settle) is called, `record` is a no-op.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.pointer == 0 {
            return None;
        }
        self.pointer -= 1;
        self.restoring = true;
        Some(self.entries[self.pointer].clone())
    }

    /// The undone snapshot has been applied; accept records again.
    pub fn settle(&mut self) {
        self.restoring = false;
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    pub fn current(&self) -> &Snapshot {
        &self.entries[self.pointer]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.enforce_limit();
    }

    fn enforce_limit(&mut self) {
        let overflow = self.entries.len().saturating_sub(self.limit);
        if overflow > 0 {
            self.entries.drain(..overflow);
            self.pointer = self.pointer.saturating_sub(overflow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn delivery(title: &str) -> Delivery {
        Delivery::new(title, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), Uuid::new_v4())
    }

    #[test]
    fn identical_state_is_not_recorded_twice() {
        let items = vec![delivery("a")];
        let mut log = HistoryLog::new(&[], &[], 10);
        assert!(log.record(&items, &[]));
        assert!(!log.record(&items, &[]));
        assert_eq!(log.len(), 2);
        assert_eq!(log.pointer(), 1);
    }

    #[test]
    fn undo_walks_back_and_stops_at_zero() {
        let a = vec![delivery("a")];
        let mut log = HistoryLog::new(&[], &[], 10);
        log.record(&a, &[]);

        let snap = log.undo().expect("one step back");
        assert!(snap.deliveries.is_empty());
        log.settle();
        assert!(log.undo().is_none());
        assert_eq!(log.pointer(), 0);
    }

    #[test]
    fn record_after_undo_truncates() {
        let (a, b, c) = (vec![delivery("a")], vec![delivery("b")], vec![delivery("c")]);
        let mut log = HistoryLog::new(&[], &[], 10);
        log.record(&a, &[]);
        log.record(&b, &[]);
        log.undo();
        log.settle();
        log.record(&c, &[]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.current().deliveries, c);
    }

    #[test]
    fn record_is_ignored_while_restoring() {
        let a = vec![delivery("a")];
        let mut log = HistoryLog::new(&[], &[], 10);
        log.record(&a, &[]);
        let restored = log.undo().unwrap();
        assert!(log.is_restoring());
        assert!(!log.record(&restored.deliveries, &restored.connections));
        assert!(!log.record(&a, &[]));
        log.settle();
        assert_eq!(log.len(), 2);
        assert_eq!(log.pointer(), 0);
    }

    #[test]
    fn limit_drops_oldest_and_keeps_pointer_valid() {
        let mut log = HistoryLog::new(&[], &[], 3);
        for i in 0..5 {
            log.record(&[delivery(&format!("item {i}"))], &[]);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.pointer(), 2);
        assert_eq!(log.current().deliveries[0].title, "item 4");

        log.set_limit(1);
        assert_eq!(log.len(), 1);
        assert_eq!(log.pointer(), 0);
        assert!(!log.can_undo());
    }
}
