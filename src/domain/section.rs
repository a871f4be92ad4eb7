// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named, ordered groups of entries.

use crate::domain::entry::Entry;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A named section holding entries in insertion order.
///
/// Keys are unique within a section and compared case-sensitively.
///
/// # Examples
///
/// ```
/// use atomcfg::domain::Section;
///
/// let mut section = Section::new("Adapter");
/// section.set("Name", "pixel");
/// section.set("Discoverable", "false");
/// section.set("Name", "pixel 7");
///
/// let keys: Vec<&str> = section.entries().map(|e| e.key()).collect();
/// assert_eq!(keys, ["Name", "Discoverable"]);
/// assert_eq!(section.get("Name"), Some("pixel 7"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    name: String,
    entries: Vec<Entry>,
}

impl Section {
    /// Creates an empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Returns the section name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates over the entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the section has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the entry for `key`.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key() == key)
    }

    /// Looks up the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry(key).map(Entry::value)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    /// Overwrites the value of `key` in place, or appends a new entry.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|e| e.key() == key) {
            Some(entry) => entry.set_value(value),
            None => self.entries.push(Entry::new(key, value)),
        }
    }

    /// Removes `key`, returning `false` if it was absent.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.entries.iter().position(|e| e.key() == key) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Stable-sorts the entries by key with `compare`.
    pub fn sort_by_key_with<F>(&mut self, mut compare: F)
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        self.entries.sort_by(|a, b| compare(a.key(), b.key()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_appends_in_order() {
        let mut section = Section::new("Sec");
        section.set("b", "1");
        section.set("a", "2");
        section.set("c", "3");
        let keys: Vec<&str> = section.entries().map(Entry::key).collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(section.len(), 3);
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut section = Section::new("Sec");
        section.set("a", "1");
        section.set("b", "2");
        section.set("a", "3");
        assert_eq!(section.len(), 2);
        assert_eq!(section.entries().next().map(Entry::value), Some("3"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut section = Section::new("Sec");
        section.set("Key", "upper");
        section.set("key", "lower");
        assert_eq!(section.get("Key"), Some("upper"));
        assert_eq!(section.get("key"), Some("lower"));
        assert_eq!(section.get("KEY"), None);
    }

    #[test]
    fn test_remove() {
        let mut section = Section::new("Sec");
        section.set("a", "1");
        assert!(section.remove("a"));
        assert!(!section.remove("a"));
        assert!(section.is_empty());
    }

    #[test]
    fn test_sort_is_stable_with_comparator() {
        let mut section = Section::new("Sec");
        section.set("LinkKey", "1");
        section.set("Addr", "2");
        section.set("Name", "3");
        section.sort_by_key_with(|a, b| a.len().cmp(&b.len()));
        let keys: Vec<&str> = section.entries().map(Entry::key).collect();
        assert_eq!(keys, ["Addr", "Name", "LinkKey"]);
    }
}
