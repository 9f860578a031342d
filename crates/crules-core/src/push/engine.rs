//! PushEngine implementation

use std::path::PathBuf;

use crules_fs::{RulesPath, Snapshot};
use crules_git::{PushRecovery, Refresh, VersionControl};

use crate::Result;
use crate::changeset::ChangeSet;
use crate::config::Profile;
use crate::remote::open_mirror;

/// Options for a push run
#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    /// Report the change counts without writing anything
    pub dry_run: bool,
    /// Skip the review step
    pub force: bool,
}

/// Approves a change set before anything is written to the mirror.
pub trait PushReviewer {
    /// Return `false` to cancel the push.
    fn review(&mut self, changes: &ChangeSet) -> Result<bool>;
}

/// Reviewer that approves everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl PushReviewer for AcceptAll {
    fn review(&mut self, _changes: &ChangeSet) -> Result<bool> {
        Ok(true)
    }
}

/// How a push run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// The working tree matches the mirror; no version-control call was made
    NothingToDo,
    /// Dry-run: the change set was computed and nothing was written
    DryRun,
    /// The reviewer declined
    Cancelled,
    /// The changes were written but the mirror already had them committed
    AlreadyInRepository,
    Pushed {
        message: String,
        recovery: PushRecovery,
    },
}

/// Result of a push run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReport {
    pub outcome: PushOutcome,
    pub changes: ChangeSet,
    pub refresh: Refresh,
    pub cache_dir: PathBuf,
}

/// Runs one push for one profile.
pub struct PushEngine<'a> {
    profile: &'a Profile,
    cwd: PathBuf,
    vcs: &'a dyn VersionControl,
}

impl<'a> PushEngine<'a> {
    pub fn new(profile: &'a Profile, cwd: impl Into<PathBuf>, vcs: &'a dyn VersionControl) -> Self {
        Self {
            profile,
            cwd: cwd.into(),
            vcs,
        }
    }

    pub fn run(&self, options: &PushOptions, reviewer: &mut dyn PushReviewer) -> Result<PushReport> {
        let ready = open_mirror(self.profile, self.vcs)?;
        let content_dir = ready.content_dir();
        let working_dir = self.cwd.join(RulesPath::CursorDir.as_str());

        let pattern = self.profile.protected();
        let changes = ChangeSet::compute(
            &Snapshot::scan(&content_dir),
            &Snapshot::scan(&working_dir),
            |path| pattern.matches_path(path),
        );

        let report = |outcome| PushReport {
            outcome,
            changes: changes.clone(),
            refresh: ready.refresh.clone(),
            cache_dir: self.profile.cache_dir.clone(),
        };

        if changes.is_empty() {
            tracing::debug!("No local changes to push");
            return Ok(report(PushOutcome::NothingToDo));
        }
        if options.dry_run {
            return Ok(report(PushOutcome::DryRun));
        }
        if !options.force && !reviewer.review(&changes)? {
            tracing::debug!("Push cancelled by reviewer");
            return Ok(report(PushOutcome::Cancelled));
        }

        changes.apply_to(&content_dir)?;
        if ready.mirror.is_clean()? {
            tracing::debug!("Mirror already contains these changes");
            return Ok(report(PushOutcome::AlreadyInRepository));
        }

        ready.mirror.ensure_identity(&self.cwd)?;
        let message = self.profile.commit_message(&changes.summary());
        let recovery = ready.mirror.commit_and_push(&message)?;

        Ok(report(PushOutcome::Pushed { message, recovery }))
    }
}
