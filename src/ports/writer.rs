// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration writer trait definition.

use crate::domain::{ConfigStore, Result};
use crate::ports::DiagnosticSink;
use std::path::Path;

/// A trait for committing a store to a destination.
///
/// Implementations must either replace the destination completely or leave it
/// as it was. A failed call never leaves a partially written destination.
pub trait ConfigWriter {
    /// Replaces the contents of `path` with the serialized `store`.
    ///
    /// # Arguments
    ///
    /// * `store` - The store to serialize
    /// * `path` - The destination file
    /// * `sink` - Receives best-effort failures that did not abort the save
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The new content is in place
    /// * `Err(ConfigError)` - The save failed; the destination is unchanged
    fn save(&self, store: &ConfigStore, path: &Path, sink: &dyn DiagnosticSink) -> Result<()>;
}
