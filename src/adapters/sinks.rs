// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic sink adapters.

use crate::ports::{Diagnostic, DiagnosticKind, DiagnosticSink, Severity};
use std::sync::{Arc, Mutex, MutexGuard};

/// Forwards diagnostics to `tracing` at the matching level.
///
/// This is the sink used when callers do not pass one.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        let kind = diagnostic.kind;
        match diagnostic.severity {
            Severity::Debug => tracing::debug!(?kind, "{}", diagnostic),
            Severity::Info => tracing::info!(?kind, "{}", diagnostic),
            Severity::Warning => tracing::warn!(?kind, "{}", diagnostic),
            Severity::Error => tracing::error!(?kind, "{}", diagnostic),
        }
    }
}

/// Drops every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Records diagnostics in memory.
///
/// Clones share the same buffer, so one handle can be given away (for example
/// boxed into a [`ConfigFile`](crate::service::ConfigFile)) while another is
/// kept for inspection.
///
/// # Examples
///
/// ```rust
/// use atomcfg::adapters::CollectingSink;
/// use atomcfg::domain::ConfigStore;
/// use atomcfg::ports::DiagnosticKind;
///
/// let sink = CollectingSink::new();
/// let mut store = ConfigStore::new();
/// store.set_string_with("Sec", "key", "one\ntwo", &sink);
///
/// assert_eq!(sink.count_of(DiagnosticKind::NewlineTruncated), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    diagnostics: Arc<Mutex<Vec<Diagnostic>>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Counts recorded diagnostics of one kind.
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.lock().iter().filter(|d| d.kind == kind).count()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }
}
