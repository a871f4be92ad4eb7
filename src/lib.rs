// SPDX-License-Identifier: MIT OR Apache-2.0

//! An ordered, INI-style configuration store with crash-safe persistence.
//!
//! This crate keeps small amounts of structured configuration (device
//! identities, pairing state, feature flags) in memory, reads them from a
//! forgiving line-oriented text format, and writes them back to disk so that
//! the file is never observed half-written, even across power loss.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: The store model (`ConfigStore`, `Section`, `Entry`,
//!   `Item`), scalar conversions and errors
//! - **Ports**: Trait definitions for the seams (`ConfigParser`,
//!   `ConfigWriter`, `DiagnosticSink`)
//! - **Adapters**: The INI parser, the atomic file writer and diagnostic sinks
//! - **Service**: File-backed constructors and the `ConfigFile` handle
//!
//! # File Format
//!
//! ```text
//! # comment line, kept through load and save
//!
//! [Adapter]
//! Address = 00:11:22:33:44:55
//! Name = kitchen speaker
//!
//! [aa:bb:cc:dd:ee:ff]
//! LinkKeyType = 4
//! ```
//!
//! Key/value lines before the first header belong to the `Info` section.
//! Malformed lines are skipped and reported, never fatal.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use atomcfg::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let mut store = ConfigStore::from_file("/data/misc/bluedroid/bt_config.conf")?;
//! let timeout = store.get_int("Adapter", "DiscoveryTimeout", 120);
//! store.set_int("Adapter", "DiscoveryTimeout", timeout * 2);
//! store.save("/data/misc/bluedroid/bt_config.conf")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! A store has a single owner and no internal locking. Saving blocks the
//! calling thread on file I/O and fsync; move the call to a worker thread if
//! that matters.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{
        AtomicFileWriter, CollectingSink, IniParser, NullSink, ParserOptions, TracingSink,
        WriterOptions,
    };
    pub use crate::domain::{
        ConfigError, ConfigScalar, ConfigStore, Entry, Item, Result, Section, DEFAULT_SECTION,
    };
    pub use crate::ports::{ConfigParser, ConfigWriter, Diagnostic, DiagnosticKind, DiagnosticSink};
    pub use crate::service::{ConfigFile, ConfigFileBuilder};
}
