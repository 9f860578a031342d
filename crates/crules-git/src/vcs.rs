//! The version-control collaborator interface

use std::path::Path;

use crate::Result;

/// One line of a porcelain status listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Two-character porcelain code, e.g. `" M"`, `"A "`, `"??"`
    pub status: String,
    /// Path relative to the repository root
    pub path: String,
}

impl StatusEntry {
    pub fn new(status: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            path: path.into(),
        }
    }
}

/// Which configuration layer a lookup consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// The repository's own config only
    Local,
    /// The user's global config only
    Global,
    /// Whatever value is in effect for the directory (local over global over system)
    Effective,
}

/// Operations the mirror needs from a version-control system.
///
/// Every method is synchronous and blocks until the underlying operation
/// completes. Failures of network operations should surface the tool's
/// output through [`crate::Error::CommandFailed`] so that push rejections can
/// be classified.
pub trait VersionControl {
    /// Clone `url` into `dest`. The parent of `dest` may not exist yet.
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    /// Fast-forward the current branch from its upstream.
    fn pull(&self, cwd: &Path) -> Result<()>;

    /// Rebase local commits onto the upstream branch.
    fn pull_rebase(&self, cwd: &Path) -> Result<()>;

    /// Fetch from `origin` without touching the working tree.
    fn fetch(&self, cwd: &Path) -> Result<()>;

    /// Uncommitted changes, including untracked files.
    fn status(&self, cwd: &Path) -> Result<Vec<StatusEntry>>;

    fn add(&self, cwd: &Path, pathspec: &str) -> Result<()>;

    fn commit(&self, cwd: &Path, message: &str) -> Result<()>;

    fn push(&self, cwd: &Path) -> Result<()>;

    /// Push the current branch and record `origin` as its upstream.
    fn push_set_upstream(&self, cwd: &Path) -> Result<()>;

    fn config_get(&self, key: &str, scope: ConfigScope, cwd: &Path) -> Result<Option<String>>;

    /// Set a key in the repository's local config.
    fn config_set(&self, key: &str, value: &str, cwd: &Path) -> Result<()>;
}
