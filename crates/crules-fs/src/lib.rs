//! Filesystem layer for crules
//!
//! Provides normalized relative paths, point-in-time directory snapshots,
//! content digests and crash-safe document I/O.

pub mod checksum;
pub mod document;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;
pub mod snapshot;

pub use checksum::compute_content_checksum;
pub use error::{Error, Result};
pub use layout::RulesPath;
pub use path::{NormalizedPath, expand_home};
pub use snapshot::Snapshot;
