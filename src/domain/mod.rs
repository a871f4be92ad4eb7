// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the store model and its types.
//!
//! The store owns its sections and each section owns its entries. Nothing in
//! this layer performs I/O.

pub mod entry;
pub mod errors;
pub mod section;
pub mod store;
pub mod value;

// Re-export commonly used types
pub use entry::Entry;
pub use errors::{ConfigError, Result, SaveStep};
pub use section::Section;
pub use store::{ConfigStore, Item, Sections, COMMENT_PREFIX, DEFAULT_SECTION};
pub use value::ConfigScalar;
