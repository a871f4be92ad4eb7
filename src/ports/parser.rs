// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which turns a stream of text
//! into entries of a [`ConfigStore`].

use crate::domain::{ConfigStore, Result};
use crate::ports::DiagnosticSink;
use std::io::BufRead;

/// A trait for parsing configuration text into a store.
///
/// Parsers are expected to be forgiving: a malformed line is reported to the
/// sink and skipped. Only a failure to read the input itself is an error.
///
/// # Examples
///
/// ```rust
/// use atomcfg::domain::{ConfigStore, Result};
/// use atomcfg::ports::{ConfigParser, DiagnosticSink};
/// use std::io::BufRead;
///
/// /// Reads `key value` pairs into one section.
/// struct SpaceSeparated;
///
/// impl ConfigParser for SpaceSeparated {
///     fn parse_into(
///         &self,
///         reader: &mut dyn BufRead,
///         store: &mut ConfigStore,
///         _sink: &dyn DiagnosticSink,
///     ) -> Result<()> {
///         for line in reader.lines() {
///             let line = line?;
///             if let Some((key, value)) = line.split_once(' ') {
///                 store.set_string("Info", key, value);
///             }
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait ConfigParser {
    /// Parses `reader` to its end, adding what it finds to `store`.
    ///
    /// # Arguments
    ///
    /// * `reader` - The text to parse
    /// * `store` - The store receiving sections and entries
    /// * `sink` - Receives a diagnostic for every skipped line
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The input was read to the end
    /// * `Err(ConfigError)` - Reading the input failed
    fn parse_into(
        &self,
        reader: &mut dyn BufRead,
        store: &mut ConfigStore,
        sink: &dyn DiagnosticSink,
    ) -> Result<()>;
}
