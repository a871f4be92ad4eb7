// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer wiring the store to files.
//!
//! This module adds file-backed constructors and `save` to
//! [`ConfigStore`](crate::domain::ConfigStore), and provides [`ConfigFile`],
//! a store bound to its path.

pub mod config_file;
mod store_io;

// Re-export commonly used types
pub use config_file::{ConfigFile, ConfigFileBuilder};
