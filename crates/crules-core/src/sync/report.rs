use std::path::PathBuf;

use crules_git::Refresh;

/// What a sync did, or would do under dry-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub dry_run: bool,
    /// How the mirror was brought up to date
    pub refresh: Refresh,
    /// Mirrored `.cursor` directory
    pub source: PathBuf,
    /// Working tree `.cursor` directory
    pub target: PathBuf,
    /// Files copied from the mirror (or that would be)
    pub copied: usize,
    /// Protected files kept from the working tree (or that would be)
    pub preserved: usize,
    pub warnings: Vec<String>,
}
