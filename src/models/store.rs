// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! In-memory entry store (UI-agnostic).

use thiserror::Error;

use crate::models::entry::TimesheetEntry;

/// Errors raised by index-based store mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Entry index {index} is out of range (store holds {len} entries)")]
    OutOfRange { index: usize, len: usize },
}

/// Ordered collection of entries; insertion order is display and file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimesheetStore {
    entries: Vec<TimesheetEntry>,
}

impl TimesheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already validated entries, keeping their order.
    pub fn from_entries(entries: Vec<TimesheetEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry at the end.
    pub fn add(&mut self, entry: TimesheetEntry) {
        log::debug!("adding entry #{} ({} h)", self.entries.len(), entry.hours);
        self.entries.push(entry);
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Result<TimesheetEntry, StoreError> {
        self.check(index)?;
        log::debug!("removing entry #{index}");
        Ok(self.entries.remove(index))
    }

    /// Replace the entry at `index` in place, returning the previous one.
    pub fn update(
        &mut self,
        index: usize,
        entry: TimesheetEntry,
    ) -> Result<TimesheetEntry, StoreError> {
        self.check(index)?;
        log::debug!("updating entry #{index}");
        Ok(std::mem::replace(&mut self.entries[index], entry))
    }

    /// Current entries in insertion order.
    pub fn list(&self) -> &[TimesheetEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TimesheetEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn check(&self, index: usize) -> Result<(), StoreError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(StoreError::OutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(desc: &str, hours: f64) -> TimesheetEntry {
        TimesheetEntry::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            desc,
            hours,
            "kdg",
            true,
        )
    }

    #[test]
    fn add_grows_by_one_and_keeps_order() {
        let mut store = TimesheetStore::new();
        for (i, desc) in ["a", "b", "c"].iter().enumerate() {
            store.add(entry(desc, 1.0));
            assert_eq!(store.len(), i + 1);
        }

        let order: Vec<_> = store.list().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn remove_out_of_range_leaves_store_unchanged() {
        let mut store = TimesheetStore::from_entries(vec![entry("a", 1.0)]);
        let before = store.clone();

        let err = store.remove(1).unwrap_err();

        assert_eq!(err, StoreError::OutOfRange { index: 1, len: 1 });
        assert_eq!(store, before);
    }

    #[test]
    fn remove_returns_entry_and_shifts_rest() {
        let mut store = TimesheetStore::from_entries(vec![entry("a", 1.0), entry("b", 2.0)]);

        let removed = store.remove(0).unwrap();

        assert_eq!(removed.description, "a");
        assert_eq!(store.list()[0].description, "b");
    }

    #[test]
    fn update_replaces_in_place() {
        let mut store = TimesheetStore::from_entries(vec![entry("a", 1.0), entry("b", 2.0)]);

        let previous = store.update(1, entry("B", 3.0)).unwrap();

        assert_eq!(previous.description, "b");
        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[1].description, "B");
        assert_eq!(store.list()[1].hours, 3.0);
    }

    #[test]
    fn update_out_of_range_fails() {
        let mut store = TimesheetStore::new();

        assert!(matches!(
            store.update(0, entry("x", 1.0)),
            Err(StoreError::OutOfRange { index: 0, len: 0 })
        ));
        assert!(store.is_empty());
    }
}
