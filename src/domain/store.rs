// SPDX-License-Identifier: MIT OR Apache-2.0

//! The ordered configuration store.
//!
//! A [`ConfigStore`] owns a sequence of top-level [`Item`]s: named sections and
//! verbatim comment lines. Both keep the order in which they were first seen,
//! and the save format reproduces that order.

use crate::domain::entry::single_line;
use crate::domain::section::Section;
use crate::domain::value::ConfigScalar;
use crate::ports::{Diagnostic, DiagnosticKind, DiagnosticSink, Severity};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Section that receives entries appearing before any `[Name]` header.
pub const DEFAULT_SECTION: &str = "Info";

/// Prefix that marks a line as a comment.
pub const COMMENT_PREFIX: char = '#';

/// A top-level item of a configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Item {
    /// A `[Name]` section with its entries.
    Section(Section),
    /// A comment line, stored verbatim including its leading `#`.
    Comment(String),
}

impl Item {
    /// Returns the section name, or the comment text for comments.
    pub fn name(&self) -> &str {
        match self {
            Item::Section(section) => section.name(),
            Item::Comment(text) => text,
        }
    }

    /// Returns `true` for comment lines.
    pub fn is_comment(&self) -> bool {
        matches!(self, Item::Comment(_))
    }

    /// Returns the section, if this item is one.
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Item::Section(section) => Some(section),
            Item::Comment(_) => None,
        }
    }
}

/// Forward-only iterator over the items of a store, in order.
///
/// Created by [`ConfigStore::sections`].
#[derive(Debug, Clone)]
pub struct Sections<'a> {
    inner: std::slice::Iter<'a, Item>,
}

impl<'a> Iterator for Sections<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Sections<'_> {}

/// An in-memory, ordered section/key/value store.
///
/// All lookups use exact, case-sensitive names and the first matching section
/// wins. Getters never fail: a missing section, a missing key, or a stored
/// string that does not convert to the requested type all yield the caller's
/// default.
///
/// The store is not internally synchronized. Share it across threads only
/// behind the caller's own lock.
///
/// # Examples
///
/// ```
/// use atomcfg::domain::ConfigStore;
///
/// let mut store = ConfigStore::new();
/// store.set_string("Adapter", "Name", "kitchen speaker");
/// store.set_int("Adapter", "DiscoveryTimeout", 120);
/// store.set_bool("Adapter", "Discoverable", true);
///
/// assert_eq!(store.get_string("Adapter", "Name", ""), "kitchen speaker");
/// assert_eq!(store.get_int("Adapter", "DiscoveryTimeout", 0), 120);
/// assert!(store.get_bool("Adapter", "Discoverable", false));
/// assert_eq!(store.get_int("Adapter", "Missing", -1), -1);
/// ```
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigStore {
    items: Vec<Item>,
}

impl ConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns the number of top-level items, comments included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store holds no sections or comments.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns all top-level items in order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Iterates over sections and comment lines in order.
    pub fn sections(&self) -> Sections<'_> {
        Sections {
            inner: self.items.iter(),
        }
    }

    /// Returns `true` if a section (or comment line) with this exact name exists.
    pub fn has_section(&self, section: &str) -> bool {
        self.position(section).is_some()
    }

    /// Returns `true` if `section` exists and contains `key`.
    pub fn has_key(&self, section: &str, key: &str) -> bool {
        self.lookup(section, key).is_some()
    }

    /// Returns the named section.
    pub fn section(&self, section: &str) -> Option<&Section> {
        self.position(section)
            .and_then(|index| self.items[index].as_section())
    }

    /// Returns the stored value, or `default` if absent.
    pub fn get_string<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.lookup(section, key).unwrap_or(default)
    }

    /// Returns the stored value converted to `T`, or `default` if absent or
    /// not convertible.
    pub fn get<T: ConfigScalar>(&self, section: &str, key: &str, default: T) -> T {
        self.lookup(section, key)
            .and_then(T::from_config_str)
            .unwrap_or(default)
    }

    /// Returns the value as an `i32`.
    pub fn get_int(&self, section: &str, key: &str, default: i32) -> i32 {
        self.get(section, key, default)
    }

    /// Returns the value as a `u16`, keeping the low 16 bits of wider values.
    pub fn get_uint16(&self, section: &str, key: &str, default: u16) -> u16 {
        self.get(section, key, default)
    }

    /// Returns the value as a `u64`.
    pub fn get_uint64(&self, section: &str, key: &str, default: u64) -> u64 {
        self.get(section, key, default)
    }

    /// Returns `true`/`false` for the literal strings `"true"`/`"false"`, and
    /// `default` for anything else.
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get(section, key, default)
    }

    /// Sets a string value, creating the section and entry as needed, and
    /// reports anything unusual to `sink`.
    ///
    /// Values are cut at their first newline. Section names starting with `#`
    /// are reserved for comment lines; setting a key in one is reported as
    /// [`DiagnosticKind::InvalidSectionName`] and leaves the store unchanged.
    pub fn set_string_with(
        &mut self,
        section: &str,
        key: &str,
        value: &str,
        sink: &dyn DiagnosticSink,
    ) {
        if section.starts_with(COMMENT_PREFIX) {
            sink.report(Diagnostic::new(
                Severity::Warning,
                DiagnosticKind::InvalidSectionName,
                format!("refusing to set '{}' in comment-style section '{}'", key, section),
            ));
            return;
        }

        let kept = single_line(value);
        if kept.len() != value.len() {
            sink.report(Diagnostic::new(
                Severity::Warning,
                DiagnosticKind::NewlineTruncated,
                format!("value for [{}] {} contained a newline and was truncated", section, key),
            ));
        }

        self.insert(section, key, kept);
    }

    /// Stores `value` in its canonical string form, reporting to `sink`.
    pub fn set_with<T: ConfigScalar>(
        &mut self,
        section: &str,
        key: &str,
        value: &T,
        sink: &dyn DiagnosticSink,
    ) {
        self.set_string_with(section, key, &value.to_config_string(), sink);
    }

    /// Appends a comment line unless an item with the same text already exists.
    ///
    /// Returns `true` if the comment was added.
    pub fn push_comment(&mut self, line: &str) -> bool {
        if self.has_section(line) {
            return false;
        }
        self.items.push(Item::Comment(line.to_string()));
        true
    }

    /// Removes the first section (or comment line) with this name and all its
    /// entries. Returns `false` if none existed.
    pub fn remove_section(&mut self, section: &str) -> bool {
        match self.position(section) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes one entry. Returns `false` if the section or key did not exist.
    pub fn remove_key(&mut self, section: &str, key: &str) -> bool {
        match self.position(section).map(|index| &mut self.items[index]) {
            Some(Item::Section(target)) => target.remove(key),
            _ => false,
        }
    }

    /// Stable-sorts the entries of every section by key with `compare`.
    /// Section order is unchanged.
    pub fn sort_entries_by_key<F>(&mut self, mut compare: F)
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        for item in &mut self.items {
            if let Item::Section(section) = item {
                section.sort_by_key_with(&mut compare);
            }
        }
    }

    // `section` is never a comment name and `value` holds no newline.
    fn insert(&mut self, section: &str, key: &str, value: &str) {
        let index = match self.position(section) {
            Some(index) => index,
            None => {
                self.items.push(Item::Section(Section::new(section)));
                self.items.len() - 1
            }
        };

        match &mut self.items[index] {
            Item::Section(target) => target.set(key, value),
            Item::Comment(_) => {}
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name() == name)
    }

    fn lookup(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }
}

/// Copies every (section, key, value) triple in order.
///
/// Comment lines and sections without entries are not carried over.
impl Clone for ConfigStore {
    fn clone(&self) -> Self {
        let mut copy = ConfigStore::new();
        for section in self.items.iter().filter_map(Item::as_section) {
            for entry in section.entries() {
                copy.insert(section.name(), entry.key(), entry.value());
            }
        }
        copy
    }
}

/// Renders the on-disk format: sections as `[Name]` followed by `key = value`
/// lines, comments verbatim, and one blank line between items.
impl fmt::Display for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, item) in self.items.iter().enumerate() {
            match item {
                Item::Comment(text) => f.write_str(text)?,
                Item::Section(section) => {
                    writeln!(f, "[{}]", section.name())?;
                    for entry in section.entries() {
                        writeln!(f, "{}", entry)?;
                    }
                }
            }
            if index + 1 < self.items.len() {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}
