//! SyncEngine implementation

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crules_fs::{NormalizedPath, RulesPath};
use crules_git::VersionControl;

use crate::Result;
use crate::config::Profile;
use crate::pattern::ProtectedPattern;
use crate::remote::open_mirror;
use crate::vault::Vault;

use super::report::SyncReport;

/// Progress of a [`SyncEngine`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    /// The mirror is cloned or updated and has content
    CacheReady,
    /// Protected files are held in memory
    BackedUp,
    /// Mirror content has been copied over the working tree
    Copied,
    /// Protected files have been written back
    Restored,
    Done,
    /// A step failed; see [`SyncEngine::failed_in`]
    Failed,
}

/// Options for a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Stop before copying and only report counts
    pub dry_run: bool,
}

/// Runs one sync for one profile.
pub struct SyncEngine<'a> {
    profile: &'a Profile,
    cwd: PathBuf,
    vcs: &'a dyn VersionControl,
    state: SyncState,
    failed_in: Option<SyncState>,
}

impl<'a> SyncEngine<'a> {
    pub fn new(profile: &'a Profile, cwd: impl Into<PathBuf>, vcs: &'a dyn VersionControl) -> Self {
        Self {
            profile,
            cwd: cwd.into(),
            vcs,
            state: SyncState::Idle,
            failed_in: None,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// The state the engine was in when a step failed.
    pub fn failed_in(&self) -> Option<SyncState> {
        self.failed_in
    }

    /// Working tree `.cursor` directory
    pub fn target_dir(&self) -> PathBuf {
        self.cwd.join(RulesPath::CursorDir.as_str())
    }

    pub fn run(&mut self, options: &SyncOptions) -> Result<SyncReport> {
        match self.execute(options) {
            Ok(report) => Ok(report),
            Err(e) => {
                tracing::warn!(state = ?self.state, error = %e, "Sync failed");
                self.failed_in = Some(self.state);
                self.state = SyncState::Failed;
                Err(e)
            }
        }
    }

    fn advance(&mut self, next: SyncState) {
        tracing::debug!(from = ?self.state, to = ?next, "Sync state transition");
        self.state = next;
    }

    fn execute(&mut self, options: &SyncOptions) -> Result<SyncReport> {
        let ready = open_mirror(self.profile, self.vcs)?;
        let source = ready.content_dir();
        let target = self.target_dir();
        let warnings: Vec<String> = ready.refresh.warning().into_iter().collect();
        self.advance(SyncState::CacheReady);

        let (pattern, pattern_warning) =
            ProtectedPattern::compile_or_default(&self.profile.protected_pattern);
        let vault = Vault::capture(&target, &pattern);
        self.advance(SyncState::BackedUp);

        let plan = plan_copy(&source, &pattern);
        let mut report = SyncReport {
            dry_run: options.dry_run,
            refresh: ready.refresh.clone(),
            source: source.clone(),
            target: target.clone(),
            copied: plan.len(),
            preserved: vault.len(),
            warnings,
        };
        report.warnings.extend(pattern_warning);

        if options.dry_run {
            tracing::debug!(copied = report.copied, preserved = report.preserved, "Dry run; stopping before copy");
            return Ok(report);
        }

        copy_files(&source, &target, &plan)?;
        self.advance(SyncState::Copied);

        report.preserved = vault.restore(&target)?;
        self.advance(SyncState::Restored);

        self.advance(SyncState::Done);
        tracing::info!(copied = report.copied, preserved = report.preserved, "Sync complete");
        Ok(report)
    }
}

/// Files under `source` to copy, skipping every file or directory whose
/// name matches `pattern` together with everything beneath it.
fn plan_copy(source: &Path, pattern: &ProtectedPattern) -> Vec<NormalizedPath> {
    WalkDir::new(source)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !pattern.matches_name(&entry.file_name().to_string_lossy())
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable mirror entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(source)
                .ok()
                .map(NormalizedPath::from)
        })
        .collect()
}

fn copy_files(source: &Path, target: &Path, plan: &[NormalizedPath]) -> Result<()> {
    fs::create_dir_all(target).map_err(|e| crules_fs::Error::io(target, e))?;
    for path in plan {
        let from = path.under(source);
        let to = path.under(target);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(|e| crules_fs::Error::io(parent, e))?;
        }
        fs::copy(&from, &to).map_err(|e| crules_fs::Error::io(&from, e))?;
    }
    Ok(())
}
