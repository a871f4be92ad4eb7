// SPDX-License-Identifier: MIT OR Apache-2.0

//! A single key/value pair.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One key/value pair inside a [`Section`](crate::domain::Section).
///
/// Values never contain a newline. [`Entry::new`] and [`Entry::set_value`]
/// cut the value at its first `'\n'`.
///
/// # Examples
///
/// ```
/// use atomcfg::domain::Entry;
///
/// let entry = Entry::new("Name", "headset\nInjected = 1");
/// assert_eq!(entry.key(), "Name");
/// assert_eq!(entry.value(), "headset");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    key: String,
    value: String,
}

impl Entry {
    /// Creates an entry, truncating `value` at its first newline.
    pub fn new(key: impl Into<String>, value: &str) -> Self {
        Self {
            key: key.into(),
            value: single_line(value).to_string(),
        }
    }

    /// Returns the key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value in place, truncating at its first newline.
    pub fn set_value(&mut self, value: &str) {
        self.value.clear();
        self.value.push_str(single_line(value));
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.key, self.value)
    }
}

/// Returns the text before the first newline of `value`.
pub(crate) fn single_line(value: &str) -> &str {
    match value.find('\n') {
        Some(pos) => &value[..pos],
        None => value,
    }
}
