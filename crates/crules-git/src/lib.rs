//! Version-control layer for crules
//!
//! The [`VersionControl`] trait is the seam to the external version-control
//! system. [`GitCli`] implements it against a real `git` installation, and
//! [`Mirror`] builds the cache-level workflows (refresh, identity, push with
//! conflict recovery) on top of any implementation.

pub mod cli;
pub mod error;
pub mod mirror;
pub mod rejection;
pub mod vcs;

pub use cli::GitCli;
pub use error::{Error, Result};
pub use mirror::{Mirror, PushRecovery, Refresh};
pub use rejection::PushRejection;
pub use vcs::{ConfigScope, StatusEntry, VersionControl};
