//! Core layer for crules
//!
//! Resolves configuration profiles, classifies working-tree changes against
//! the mirrored rule repository, and orchestrates sync and push.
//!
//! ```text
//!                  crules-cli
//!                      |
//!                 crules-core
//!                      |
//!            +---------+---------+
//!            |                   |
//!        crules-fs          crules-git
//! ```
//!
//! # Example
//!
//! ```ignore
//! use crules_core::{SyncOptions, Workspace};
//!
//! let workspace = Workspace::discover(None, std::env::current_dir()?)?;
//! let report = workspace.sync(&SyncOptions::default())?;
//! println!("{} files copied, {} preserved", report.copied, report.preserved);
//! ```

pub mod changeset;
pub mod config;
pub mod diff;
pub mod error;
pub mod pattern;
pub mod push;
pub mod remote;
pub mod status;
pub mod sync;
pub mod vault;
pub mod workspace;

pub use changeset::{ChangeKind, ChangeSet, Modification};
pub use config::{ConfigStore, Profile, ResolvedConfig, Scope};
pub use diff::{DiffLine, FileDiff};
pub use error::{ConfigError, Error, Result};
pub use pattern::ProtectedPattern;
pub use push::{AcceptAll, PushEngine, PushOptions, PushOutcome, PushReport, PushReviewer};
pub use status::StatusReport;
pub use sync::{SyncEngine, SyncOptions, SyncReport, SyncState};
pub use vault::Vault;
pub use workspace::Workspace;
