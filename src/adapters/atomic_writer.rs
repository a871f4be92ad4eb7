// SPDX-License-Identifier: MIT OR Apache-2.0

//! Crash-safe writer for configuration files.
//!
//! A save never writes the destination directly:
//!
//! 1. the store is written to a sibling temporary file (`<path>.new`),
//! 2. the temporary file is fsynced and closed,
//! 3. its permissions are set to owner/group read-write,
//! 4. it is renamed over the destination,
//! 5. the parent directory is fsynced so the rename itself is durable.
//!
//! The rename is the commit point. A crash before it leaves the previous file
//! intact; a crash after it leaves the new file intact. Any hard failure before
//! the rename removes the temporary file. Failed fsyncs are reported as
//! warnings and do not fail the save.

use crate::domain::{ConfigError, ConfigStore, Result, SaveStep};
use crate::ports::{ConfigWriter, Diagnostic, DiagnosticKind, DiagnosticSink, Severity};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default suffix appended to the destination to form the temporary path.
pub const DEFAULT_TEMP_SUFFIX: &str = ".new";

/// Default permissions of a saved file: read-write for owner and group.
pub const DEFAULT_FILE_MODE: u32 = 0o660;

/// Writer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Suffix of the temporary file written next to the destination.
    pub temp_suffix: String,
    /// Unix permission bits applied before the rename. Ignored elsewhere.
    pub file_mode: u32,
    /// Issue a filesystem-wide `sync()` after the rename.
    pub sync_filesystem: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            temp_suffix: DEFAULT_TEMP_SUFFIX.to_string(),
            file_mode: DEFAULT_FILE_MODE,
            sync_filesystem: true,
        }
    }
}

/// Writes a store to disk through a temporary file and an atomic rename.
///
/// # Examples
///
/// ```rust,no_run
/// use atomcfg::adapters::{AtomicFileWriter, TracingSink};
/// use atomcfg::domain::ConfigStore;
/// use atomcfg::ports::ConfigWriter;
/// use std::path::Path;
///
/// # fn main() -> atomcfg::domain::Result<()> {
/// let mut store = ConfigStore::new();
/// store.set_string("Adapter", "Name", "desk");
///
/// AtomicFileWriter::new().save(&store, Path::new("/data/misc/bt_config.conf"), &TracingSink)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AtomicFileWriter {
    options: WriterOptions,
}

impl AtomicFileWriter {
    /// Creates a writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with the given options.
    pub fn with_options(options: WriterOptions) -> Self {
        Self { options }
    }

    /// Returns the writer options.
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Returns the temporary path used when saving to `path`.
    pub fn temp_path(&self, path: &Path) -> PathBuf {
        let mut temp = OsString::from(path.as_os_str());
        temp.push(&self.options.temp_suffix);
        PathBuf::from(temp)
    }

    fn save_using(
        &self,
        store: &ConfigStore,
        path: &Path,
        sink: &dyn DiagnosticSink,
        ops: &dyn SaveOps,
    ) -> Result<()> {
        if path.as_os_str().is_empty() || path.file_name().is_none() {
            return Err(ConfigError::InvalidPath {
                path: path.to_path_buf(),
                message: "expected a path naming a file".to_string(),
            });
        }

        let temp = self.temp_path(path);
        let result = self.commit(store, path, &temp, sink, ops);

        if let Err(e) = &result {
            // The temp file may not exist yet.
            let _ = fs::remove_file(&temp);
            sink.report(Diagnostic::new(
                Severity::Error,
                DiagnosticKind::SaveFailed,
                e.to_string(),
            ));
        } else {
            tracing::debug!("saved configuration to '{}'", path.display());
        }
        result
    }

    fn commit(
        &self,
        store: &ConfigStore,
        path: &Path,
        temp: &Path,
        sink: &dyn DiagnosticSink,
        ops: &dyn SaveOps,
    ) -> Result<()> {
        let dir_path = parent_dir(path);
        let dir = open_dir(dir_path)
            .map_err(|e| ConfigError::save(path, SaveStep::OpenDirectory, e))?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp)
            .map_err(|e| ConfigError::save(path, SaveStep::CreateTemp, e))?;

        let mut writer = BufWriter::new(file);
        write!(writer, "{}", store).map_err(|e| ConfigError::save(path, SaveStep::Write, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| ConfigError::save(path, SaveStep::Close, e.into_error()))?;

        if let Err(e) = ops.sync_file(&file) {
            sink.report(Diagnostic::new(
                Severity::Warning,
                DiagnosticKind::FsyncFailed,
                format!("unable to fsync file '{}': {}", temp.display(), e),
            ));
        }
        drop(file);

        ops.set_mode(temp, self.options.file_mode)
            .map_err(|e| ConfigError::save(path, SaveStep::SetPermissions, e))?;

        fs::rename(temp, path).map_err(|e| ConfigError::save(path, SaveStep::Rename, e))?;

        if let Some(dir) = dir {
            if let Err(e) = ops.sync_dir(&dir) {
                sink.report(Diagnostic::new(
                    Severity::Warning,
                    DiagnosticKind::DirectoryFsyncFailed,
                    format!("unable to fsync dir '{}': {}", dir_path.display(), e),
                ));
            }
        }

        if self.options.sync_filesystem {
            ops.sync_filesystem();
        }
        Ok(())
    }
}

impl ConfigWriter for AtomicFileWriter {
    fn save(&self, store: &ConfigStore, path: &Path, sink: &dyn DiagnosticSink) -> Result<()> {
        self.save_using(store, path, sink, &SystemOps)
    }
}

/// The platform calls of a save that the filesystem rarely lets fail.
trait SaveOps {
    fn sync_file(&self, file: &File) -> io::Result<()>;
    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()>;
    fn sync_dir(&self, dir: &File) -> io::Result<()>;
    fn sync_filesystem(&self);
}

struct SystemOps;

impl SaveOps for SystemOps {
    fn sync_file(&self, file: &File) -> io::Result<()> {
        file.sync_all()
    }

    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        set_mode(path, mode)
    }

    fn sync_dir(&self, dir: &File) -> io::Result<()> {
        dir.sync_all()
    }

    fn sync_filesystem(&self) {
        sync_filesystem();
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn open_dir(dir: &Path) -> io::Result<Option<File>> {
    File::open(dir).map(Some)
}

// Directories cannot be opened as files here; only check that it exists.
#[cfg(not(unix))]
fn open_dir(dir: &Path) -> io::Result<Option<File>> {
    fs::metadata(dir).map(|_| None)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn sync_filesystem() {
    nix::unistd::sync();
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn sync_filesystem() {}
