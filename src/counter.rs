//! Counter storage for analyzers.
//!
//! A [`CounterStore`] is a two-level mapping from an entry name (for
//! instance a grader email) to a subcategory label (for instance an
//! assignment name) to a signed count. Each analyzer owns exactly one
//! store; there is no shared mutable state between analyzers.
//!
//! Cells spring into existence on first write with an implicit zero
//! base, and reading an unseen cell is always zero, never an error.

use serde::Serialize;
use std::collections::BTreeMap;

/// Immutable copy of one entry's counters, keyed by subcategory.
pub type EntrySnapshot = BTreeMap<String, i64>;

/// Immutable copy of a full store: entry -> subcategory -> count.
pub type StoreSnapshot = BTreeMap<String, EntrySnapshot>;

/// Nested counter mapping owned by a single analyzer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CounterStore {
    counters: BTreeMap<String, BTreeMap<String, i64>>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` (which may be negative) to the cell at
    /// (`entry`, `subcat`), creating it at zero if absent.
    /// Returns the new value.
    pub fn delta(&mut self, entry: &str, subcat: &str, amount: i64) -> i64 {
        let cell = self
            .counters
            .entry(entry.to_string())
            .or_default()
            .entry(subcat.to_string())
            .or_insert(0);
        *cell += amount;
        *cell
    }

    /// Overwrite the cell at (`entry`, `subcat`) unconditionally.
    pub fn set(&mut self, entry: &str, subcat: &str, value: i64) {
        self.counters
            .entry(entry.to_string())
            .or_default()
            .insert(subcat.to_string(), value);
    }

    /// Current value of the cell at (`entry`, `subcat`); zero if unseen.
    pub fn get(&self, entry: &str, subcat: &str) -> i64 {
        self.counters
            .get(entry)
            .and_then(|subcats| subcats.get(subcat))
            .copied()
            .unwrap_or(0)
    }

    /// Entry names for which data has been recorded, in sorted order.
    pub fn entries(&self) -> Vec<&str> {
        self.counters.keys().map(String::as_str).collect()
    }

    /// Snapshot of one entry's counters; empty if the entry is unseen.
    pub fn entry_snapshot(&self, entry: &str) -> EntrySnapshot {
        self.counters.get(entry).cloned().unwrap_or_default()
    }

    /// Snapshot of the full nested structure.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.counters.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Drop all recorded data.
    pub fn clear(&mut self) {
        self.counters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_unseen_is_zero() {
        let store = CounterStore::new();
        assert_eq!(store.get("alice", "hw01"), 0);
    }

    #[test]
    fn test_delta_accumulates() {
        let mut store = CounterStore::new();
        store.delta("alice", "hw01", 1);
        store.delta("alice", "hw01", 3);
        store.delta("alice", "hw01", -2);
        assert_eq!(store.get("alice", "hw01"), 2);
    }

    #[test]
    fn test_delta_returns_new_value() {
        let mut store = CounterStore::new();
        assert_eq!(store.delta("alice", "hw01", 5), 5);
        assert_eq!(store.delta("alice", "hw01", -1), 4);
    }

    #[test]
    fn test_unrelated_writes_leave_zero() {
        let mut store = CounterStore::new();
        store.delta("alice", "hw01", 10);
        assert_eq!(store.get("alice", "hw02"), 0);
        assert_eq!(store.get("bob", "hw01"), 0);
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = CounterStore::new();
        store.delta("alice", "hw01", 7);
        store.set("alice", "hw01", 2);
        assert_eq!(store.get("alice", "hw01"), 2);
    }

    #[test]
    fn test_entries_and_snapshots() {
        let mut store = CounterStore::new();
        store.delta("bob", "hw02", 1);
        store.delta("alice", "hw01", 4);

        assert_eq!(store.entries(), vec!["alice", "bob"]);

        let entry = store.entry_snapshot("alice");
        assert_eq!(entry.get("hw01"), Some(&4));

        assert!(store.entry_snapshot("carol").is_empty());
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut store = CounterStore::new();
        store.delta("alice", "hw01", 1);

        let snapshot = store.snapshot();
        store.delta("alice", "hw01", 1);

        assert_eq!(snapshot["alice"]["hw01"], 1);
        assert_eq!(store.get("alice", "hw01"), 2);
    }

    #[test]
    fn test_clear() {
        let mut store = CounterStore::new();
        store.delta("alice", "hw01", 1);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.get("alice", "hw01"), 0);
    }
}
