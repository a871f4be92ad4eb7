// SPDX-License-Identifier: MIT OR Apache-2.0

//! A configuration store bound to its backing file.
//!
//! [`ConfigFile`] is what a host subsystem usually holds on to: it remembers
//! the path, the parser and writer settings and the diagnostic sink, so that
//! reloading and saving take no arguments.

use crate::adapters::{AtomicFileWriter, IniParser, ParserOptions, TracingSink, WriterOptions};
use crate::domain::{ConfigError, ConfigStore, Result};
use crate::ports::{ConfigWriter, DiagnosticSink};
use directories::ProjectDirs;
use std::fmt;
use std::path::{Path, PathBuf};

/// A [`ConfigStore`] together with the file it is loaded from and saved to.
///
/// # Examples
///
/// ```rust,no_run
/// use atomcfg::service::ConfigFile;
///
/// # fn main() -> atomcfg::domain::Result<()> {
/// let mut config = ConfigFile::open("/data/misc/bluedroid/bt_config.conf")?;
/// config.store_mut().set_bool("Adapter", "Discoverable", false);
/// config.save()?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigFile {
    path: PathBuf,
    store: ConfigStore,
    parser: IniParser,
    writer: AtomicFileWriter,
    sink: Box<dyn DiagnosticSink + Send + Sync>,
}

impl ConfigFile {
    /// Opens and parses `path` with default settings.
    ///
    /// Fails if the file cannot be opened. Use
    /// [`ConfigFileBuilder::open_or_empty`] to start empty instead.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(path).open()
    }

    /// Creates a builder for a file at `path`.
    pub fn builder(path: impl Into<PathBuf>) -> ConfigFileBuilder {
        ConfigFileBuilder::new(path)
    }

    /// Resolves `file_name` inside the OS configuration directory of an
    /// application.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use atomcfg::service::ConfigFile;
    ///
    /// # fn main() -> atomcfg::domain::Result<()> {
    /// let path = ConfigFile::default_location("com.example", "btstack", "bt_config.conf")?;
    /// let config = ConfigFile::builder(path).open_or_empty()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn default_location(qualifier: &str, app_name: &str, file_name: &str) -> Result<PathBuf> {
        let dirs = ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| {
            ConfigError::InvalidPath {
                path: PathBuf::from(file_name),
                message: "failed to determine project directories".to_string(),
            }
        })?;
        Ok(dirs.config_dir().join(file_name))
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the in-memory store.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Returns the in-memory store for mutation. Changes reach the disk on the
    /// next [`save`](Self::save).
    pub fn store_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    /// Consumes the handle, returning the store.
    pub fn into_store(self) -> ConfigStore {
        self.store
    }

    /// Sets a string value, reporting truncation to this file's sink.
    pub fn set_string(&mut self, section: &str, key: &str, value: &str) {
        self.store
            .set_string_with(section, key, value, self.sink.as_ref());
    }

    /// Atomically writes the current store to the backing file.
    pub fn save(&self) -> Result<()> {
        self.writer.save(&self.store, &self.path, self.sink.as_ref())
    }

    /// Replaces the in-memory store with the file's current contents.
    ///
    /// On error the in-memory store is kept as it was.
    pub fn reload(&mut self) -> Result<()> {
        self.store = ConfigStore::from_file_with(&self.path, &self.parser, self.sink.as_ref())?;
        Ok(())
    }
}

impl fmt::Debug for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFile")
            .field("path", &self.path)
            .field("store", &self.store)
            .field("parser", &self.parser)
            .field("writer", &self.writer)
            .finish_non_exhaustive()
    }
}

/// Builder for a [`ConfigFile`].
///
/// # Examples
///
/// ```rust,no_run
/// use atomcfg::adapters::{CollectingSink, ParserOptions};
/// use atomcfg::service::ConfigFile;
///
/// # fn main() -> atomcfg::domain::Result<()> {
/// let sink = CollectingSink::new();
/// let config = ConfigFile::builder("/tmp/device.conf")
///     .parser_options(ParserOptions {
///         default_section: "General".to_string(),
///         ..ParserOptions::default()
///     })
///     .sink(sink.clone())
///     .open()?;
///
/// for diagnostic in sink.diagnostics() {
///     eprintln!("{}", diagnostic);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ConfigFileBuilder {
    path: PathBuf,
    parser_options: ParserOptions,
    writer_options: WriterOptions,
    sink: Box<dyn DiagnosticSink + Send + Sync>,
}

impl ConfigFileBuilder {
    /// Creates a builder with default options and a [`TracingSink`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            parser_options: ParserOptions::default(),
            writer_options: WriterOptions::default(),
            sink: Box::new(TracingSink),
        }
    }

    /// Sets the parser options.
    pub fn parser_options(mut self, options: ParserOptions) -> Self {
        self.parser_options = options;
        self
    }

    /// Sets the writer options.
    pub fn writer_options(mut self, options: WriterOptions) -> Self {
        self.writer_options = options;
        self
    }

    /// Sets the diagnostic sink.
    pub fn sink(mut self, sink: impl DiagnosticSink + Send + Sync + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Opens and parses the file. Fails if it cannot be opened.
    pub fn open(self) -> Result<ConfigFile> {
        let mut file = self.into_empty();
        file.reload()?;
        Ok(file)
    }

    /// Opens and parses the file, or starts empty if it does not exist.
    ///
    /// Other open failures, such as permission errors, are still returned.
    pub fn open_or_empty(self) -> Result<ConfigFile> {
        let mut file = self.into_empty();
        match file.reload() {
            Ok(()) => Ok(file),
            Err(ConfigError::OpenError { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::info!("'{}' not found, starting empty", file.path.display());
                Ok(file)
            }
            Err(e) => Err(e),
        }
    }

    /// Builds a handle with an empty store without touching the file.
    pub fn create_empty(self) -> ConfigFile {
        self.into_empty()
    }

    fn into_empty(self) -> ConfigFile {
        ConfigFile {
            path: self.path,
            store: ConfigStore::new(),
            parser: IniParser::with_options(self.parser_options),
            writer: AtomicFileWriter::with_options(self.writer_options),
            sink: self.sink,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::CollectingSink;
    use crate::ports::DiagnosticKind;
    use std::fs;
    use tempfile::TempDir;

    fn no_sync() -> WriterOptions {
        WriterOptions {
            sync_filesystem: false,
            ..WriterOptions::default()
        }
    }

    #[test]
    fn test_open_missing_fails() {
        let dir = TempDir::new().unwrap();
        let result = ConfigFile::open(dir.path().join("missing.conf"));
        assert!(matches!(result, Err(ConfigError::OpenError { .. })));
    }

    #[test]
    fn test_open_or_empty_then_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.conf");

        let mut config = ConfigFile::builder(&path)
            .writer_options(no_sync())
            .open_or_empty()
            .unwrap();
        assert!(config.store().is_empty());

        config.store_mut().set_int("Adapter", "ScanMode", 2);
        config.save().unwrap();

        let reopened = ConfigFile::open(&path).unwrap();
        assert_eq!(reopened.store().get_int("Adapter", "ScanMode", 0), 2);
    }

    #[test]
    fn test_reload_picks_up_external_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.conf");
        fs::write(&path, "[A]\nk = 1\n").unwrap();

        let mut config = ConfigFile::open(&path).unwrap();
        fs::write(&path, "[A]\nk = 2\n").unwrap();
        config.reload().unwrap();
        assert_eq!(config.store().get_int("A", "k", 0), 2);
    }

    #[test]
    fn test_failed_reload_keeps_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.conf");
        fs::write(&path, "[A]\nk = 1\n").unwrap();

        let mut config = ConfigFile::open(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(config.reload().is_err());
        assert_eq!(config.store().get_int("A", "k", 0), 1);
    }

    #[test]
    fn test_sink_receives_parse_and_set_diagnostics() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.conf");
        fs::write(&path, "[Broken\nk = v\n").unwrap();

        let sink = CollectingSink::new();
        let mut config = ConfigFile::builder(&path).sink(sink.clone()).open().unwrap();
        config.set_string("A", "k", "x\ny");

        assert_eq!(sink.count_of(DiagnosticKind::UnterminatedSection), 1);
        assert_eq!(sink.count_of(DiagnosticKind::NewlineTruncated), 1);
        assert_eq!(config.store().get_string("A", "k", ""), "x");
    }

    #[test]
    fn test_parser_options_apply() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cfg.conf");
        fs::write(&path, "k = v\n").unwrap();

        let config = ConfigFile::builder(&path)
            .parser_options(ParserOptions {
                default_section: "General".to_string(),
                ..ParserOptions::default()
            })
            .open()
            .unwrap();
        assert_eq!(config.store().get_string("General", "k", ""), "v");
    }

    #[test]
    fn test_create_empty_does_not_touch_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("untouched.conf");
        let config = ConfigFile::builder(&path).create_empty();
        assert_eq!(config.path(), path.as_path());
        assert!(!path.exists());
        assert!(config.into_store().is_empty());
    }
}
