// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! These traits are the seams between the store and the outside world: where
//! text comes from, where it goes, and who hears about skipped lines and
//! degraded saves. Adapters in the adapters layer implement them.

pub mod diagnostics;
pub mod parser;
pub mod writer;

// Re-export commonly used types
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, Severity};
pub use parser::ConfigParser;
pub use writer::ConfigWriter;
