// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed constructors, saving and logged setters for [`ConfigStore`].
//!
//! These wire the default adapters together: [`IniParser`] for reading,
//! [`AtomicFileWriter`] for saving and [`TracingSink`] for diagnostics. Use the
//! `*_with` variants to supply your own.

use crate::adapters::{AtomicFileWriter, IniParser, TracingSink};
use crate::domain::{ConfigError, ConfigScalar, ConfigStore, Result};
use crate::ports::{ConfigParser, ConfigWriter, DiagnosticSink};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

impl ConfigStore {
    /// Loads a store from a configuration file.
    ///
    /// Fails only if the file cannot be opened or read. Malformed lines are
    /// logged and skipped.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use atomcfg::domain::ConfigStore;
    ///
    /// # fn main() -> atomcfg::domain::Result<()> {
    /// let store = ConfigStore::from_file("/data/misc/bluedroid/bt_config.conf")?;
    /// let name = store.get_string("Adapter", "Name", "unnamed");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with(path, &IniParser::new(), &TracingSink)
    }

    /// Loads a store from a file with an explicit parser and sink.
    pub fn from_file_with(
        path: impl AsRef<Path>,
        parser: &dyn ConfigParser,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            tracing::error!("unable to open file '{}': {}", path.display(), source);
            ConfigError::OpenError {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let mut reader = BufReader::new(file);
        Self::from_reader_with(&mut reader, parser, sink)
    }

    /// Parses a store from any buffered reader.
    pub fn from_reader(reader: &mut dyn BufRead) -> Result<Self> {
        Self::from_reader_with(reader, &IniParser::new(), &TracingSink)
    }

    /// Parses a store from a reader with an explicit parser and sink.
    pub fn from_reader_with(
        reader: &mut dyn BufRead,
        parser: &dyn ConfigParser,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self> {
        let mut store = ConfigStore::new();
        parser.parse_into(reader, &mut store, sink)?;
        Ok(store)
    }

    /// Parses a store from text already in memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use atomcfg::domain::ConfigStore;
    ///
    /// let store = ConfigStore::parse("# paired devices\n[aa:bb:cc:dd:ee:ff]\nLinkKeyType = 4\n");
    /// assert!(store.has_section("# paired devices"));
    /// assert_eq!(store.get_int("aa:bb:cc:dd:ee:ff", "LinkKeyType", 0), 4);
    /// ```
    pub fn parse(text: &str) -> Self {
        IniParser::new().parse_str(text, &TracingSink)
    }

    /// Atomically replaces `path` with this store's contents.
    ///
    /// On error the previous file, or its absence, is left as it was.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with(path, &AtomicFileWriter::new(), &TracingSink)
    }

    /// Saves with an explicit writer and sink.
    pub fn save_with(
        &self,
        path: impl AsRef<Path>,
        writer: &dyn ConfigWriter,
        sink: &dyn DiagnosticSink,
    ) -> Result<()> {
        writer.save(self, path.as_ref(), sink)
    }

    /// Sets a string value, creating the section and entry as needed.
    ///
    /// Values are cut at their first newline; the truncation is logged. See
    /// [`set_string_with`](Self::set_string_with).
    pub fn set_string(&mut self, section: &str, key: &str, value: &str) {
        self.set_string_with(section, key, value, &TracingSink);
    }

    /// Stores `value` in its canonical string form.
    pub fn set<T: ConfigScalar>(&mut self, section: &str, key: &str, value: &T) {
        self.set_with(section, key, value, &TracingSink);
    }

    /// Stores an `i32` as decimal.
    pub fn set_int(&mut self, section: &str, key: &str, value: i32) {
        self.set(section, key, &value);
    }

    /// Stores a `u16` as decimal.
    pub fn set_uint16(&mut self, section: &str, key: &str, value: u16) {
        self.set(section, key, &value);
    }

    /// Stores a `u64` as decimal.
    pub fn set_uint64(&mut self, section: &str, key: &str, value: u64) {
        self.set(section, key, &value);
    }

    /// Stores a boolean as `true` or `false`.
    pub fn set_bool(&mut self, section: &str, key: &str, value: bool) {
        self.set(section, key, &value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CollectingSink, WriterOptions};
    use crate::ports::DiagnosticKind;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn writer() -> AtomicFileWriter {
        AtomicFileWriter::with_options(WriterOptions {
            sync_filesystem: false,
            ..WriterOptions::default()
        })
    }

    #[test]
    fn test_from_file_missing_is_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigStore::from_file(dir.path().join("absent.conf")).unwrap_err();
        assert!(matches!(err, ConfigError::OpenError { .. }));
    }

    #[test]
    fn test_from_file_empty_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.conf");
        std::fs::write(&path, "").unwrap();
        let store = ConfigStore::from_file(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_from_reader_with_reports_to_sink() {
        let sink = CollectingSink::new();
        let mut input = Cursor::new("[Sec]\nnoseparator\n");
        let store = ConfigStore::from_reader_with(&mut input, &IniParser::new(), &sink).unwrap();
        // A header alone does not create the section.
        assert!(!store.has_section("Sec"));
        assert!(store.is_empty());
        assert_eq!(sink.count_of(DiagnosticKind::MissingSeparator), 1);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bt_config.conf");

        let mut store = ConfigStore::new();
        store.push_comment("# header");
        store.set_uint16("Adapter", "Port", 8080);
        store.save_with(&path, &writer(), &CollectingSink::new()).unwrap();

        let loaded = ConfigStore::from_file(&path).unwrap();
        assert_eq!(loaded, store);
    }
}
