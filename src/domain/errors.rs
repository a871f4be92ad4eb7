// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration store.
//!
//! Lookups never fail: every getter takes a default. Errors only surface when a
//! file cannot be opened or read, or when an atomic save cannot complete.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A step of the atomic save protocol.
///
/// Reported inside [`ConfigError::SaveError`] so callers can tell how far a
/// failed save got. Every step happens before the rename or is the rename
/// itself, so a failed save never changes the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStep {
    /// Opening the parent directory of the destination.
    OpenDirectory,
    /// Creating or truncating the temporary file.
    CreateTemp,
    /// Writing the serialized store to the temporary file.
    Write,
    /// Flushing and closing the temporary file.
    Close,
    /// Restricting the temporary file's permissions.
    SetPermissions,
    /// Renaming the temporary file over the destination.
    Rename,
}

impl fmt::Display for SaveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SaveStep::OpenDirectory => "open directory",
            SaveStep::CreateTemp => "create temporary file",
            SaveStep::Write => "write temporary file",
            SaveStep::Close => "close temporary file",
            SaveStep::SetPermissions => "set permissions",
            SaveStep::Rename => "rename",
        };
        f.write_str(name)
    }
}

/// The main error type for configuration store operations.
///
/// # Examples
///
/// ```
/// use atomcfg::domain::errors::ConfigError;
/// use std::path::PathBuf;
///
/// let error = ConfigError::InvalidPath {
///     path: PathBuf::new(),
///     message: "path is empty".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid configuration path '': path is empty");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be opened for reading.
    #[error("Unable to open configuration file '{}': {source}", .path.display())]
    OpenError {
        /// The path that failed to open
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },

    /// Reading the configuration text failed part way through.
    #[error("Unable to read configuration line {line}: {source}")]
    ReadError {
        /// The 1-based line number being read when the error occurred
        line: usize,
        /// The underlying I/O error
        source: io::Error,
    },

    /// The given path cannot be used as a configuration file.
    #[error("Invalid configuration path '{}': {message}", .path.display())]
    InvalidPath {
        /// The rejected path
        path: PathBuf,
        /// Why the path was rejected
        message: String,
    },

    /// An atomic save failed. The destination file was left untouched.
    #[error("Unable to save configuration to '{}' ({step}): {source}", .path.display())]
    SaveError {
        /// The destination path
        path: PathBuf,
        /// The protocol step that failed
        step: SaveStep,
        /// The underlying I/O error
        source: io::Error,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl ConfigError {
    /// Creates a [`ConfigError::SaveError`] for the given step.
    pub fn save(path: impl Into<PathBuf>, step: SaveStep, source: io::Error) -> Self {
        ConfigError::SaveError {
            path: path.into(),
            step,
            source,
        }
    }

    /// Returns the failing save step, if this is a save error.
    pub fn save_step(&self) -> Option<SaveStep> {
        match self {
            ConfigError::SaveError { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// A specialized Result type for configuration store operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
