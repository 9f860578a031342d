//! The per-invocation bundle of directories, configuration and collaborator

use std::path::{Path, PathBuf};

use crules_git::{GitCli, VersionControl};

use crate::Result;
use crate::config::{ConfigStore, Profile};
use crate::diff::{FileDiff, diff_file};
use crate::push::{PushEngine, PushOptions, PushReport, PushReviewer};
use crate::status::{StatusReport, status};
use crate::sync::{SyncEngine, SyncOptions, SyncReport};

/// Everything one command needs: where it runs, whose home it reads and
/// how it talks to version control.
pub struct Workspace {
    cwd: PathBuf,
    store: ConfigStore,
    vcs: Box<dyn VersionControl>,
}

impl Workspace {
    pub fn new(home: &Path, cwd: &Path, vcs: Box<dyn VersionControl>) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            store: ConfigStore::open(home, cwd),
            vcs,
        }
    }

    /// Workspace for `cwd` using the real `git`.
    ///
    /// `home` defaults to the user's home directory.
    pub fn discover(home: Option<PathBuf>, cwd: PathBuf) -> Result<Self> {
        let home = match home.or_else(dirs::home_dir) {
            Some(home) => home,
            None => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not determine home directory",
                )
                .into());
            }
        };
        tracing::debug!(home = %home.display(), cwd = %cwd.display(), "Opening workspace");
        Ok(Self::new(&home, &cwd, Box::new(GitCli::new())))
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn home(&self) -> &Path {
        self.store.home()
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn vcs(&self) -> &dyn VersionControl {
        self.vcs.as_ref()
    }

    pub fn active_profile(&self) -> Profile {
        self.store.resolve().active_profile().clone()
    }

    pub fn sync(&self, options: &SyncOptions) -> Result<SyncReport> {
        let profile = self.active_profile();
        tracing::debug!(alias = %profile.alias, "Syncing");
        SyncEngine::new(&profile, &self.cwd, self.vcs()).run(options)
    }

    pub fn push(&self, options: &PushOptions, reviewer: &mut dyn PushReviewer) -> Result<PushReport> {
        let profile = self.active_profile();
        tracing::debug!(alias = %profile.alias, "Pushing");
        PushEngine::new(&profile, &self.cwd, self.vcs()).run(options, reviewer)
    }

    pub fn status(&self) -> Result<StatusReport> {
        status(&self.active_profile(), &self.cwd, self.vcs())
    }

    pub fn diff(&self, path: &str, verbose: bool) -> Result<FileDiff> {
        diff_file(&self.active_profile(), &self.cwd, self.vcs(), path, verbose)
    }
}
