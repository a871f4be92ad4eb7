// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing implementations of the ports.
//!
//! - [`IniParser`] reads the INI-like text format.
//! - [`AtomicFileWriter`] commits a store to disk through temp-file-and-rename.
//! - [`TracingSink`], [`CollectingSink`] and [`NullSink`] receive diagnostics.

pub mod atomic_writer;
pub mod ini_parser;
pub mod sinks;

// Re-export commonly used types
pub use atomic_writer::{AtomicFileWriter, WriterOptions};
pub use ini_parser::{IniParser, ParserOptions};
pub use sinks::{CollectingSink, NullSink, TracingSink};
