// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic sink trait definition.
//!
//! Parsing and saving are best-effort: malformed lines are skipped and failed
//! fsyncs are tolerated. Each such event is reported to a [`DiagnosticSink`]
//! passed in by the caller, so hosts can route them to their own log or inspect
//! them in tests.

use std::fmt;

/// Severity of a reported event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Routine detail, such as a skipped malformed line.
    Debug,
    /// Informational.
    Info,
    /// Something was degraded but the operation continued.
    Warning,
    /// The operation failed.
    Error,
}

/// What kind of event a [`Diagnostic`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DiagnosticKind {
    /// A `[` header line without a closing `]`.
    UnterminatedSection,
    /// A key/value line dropped because the current section header was invalid.
    SkippedEntry,
    /// A key/value line without `=`.
    MissingSeparator,
    /// A line that hit the maximum line length and was discarded.
    OversizedLine,
    /// A line was not valid UTF-8; invalid bytes were replaced with U+FFFD.
    InvalidUtf8,
    /// A value contained a newline and was cut before it.
    NewlineTruncated,
    /// A normal entry was addressed to a comment-style section name.
    InvalidSectionName,
    /// Syncing the temporary file failed.
    FsyncFailed,
    /// Syncing the parent directory failed.
    DirectoryFsyncFailed,
    /// An atomic save failed.
    SaveFailed,
}

/// A single reported event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the event is
    pub severity: Severity,
    /// What happened
    pub kind: DiagnosticKind,
    /// 1-based input line, for parse events
    pub line: Option<usize>,
    /// Human-readable detail
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic that is not tied to an input line.
    pub fn new(severity: Severity, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            line: None,
            message: message.into(),
        }
    }

    /// Creates a diagnostic for a specific input line.
    pub fn at_line(
        severity: Severity,
        kind: DiagnosticKind,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind,
            line: Some(line),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// A collaborator that receives diagnostics.
///
/// Implementations must not panic; reporting is never allowed to change the
/// outcome of the operation that reports.
///
/// # Examples
///
/// ```rust
/// use atomcfg::ports::{Diagnostic, DiagnosticSink, Severity};
/// use std::cell::Cell;
///
/// struct CountingSink(Cell<usize>);
///
/// impl DiagnosticSink for CountingSink {
///     fn report(&self, _diagnostic: Diagnostic) {
///         self.0.set(self.0.get() + 1);
///     }
/// }
/// ```
pub trait DiagnosticSink {
    /// Records one event.
    fn report(&self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic)
    }
}
