//! The locally cached clone of a rule repository
//!
//! A [`Mirror`] owns no state beyond its location. Every call re-reads the
//! cache from disk through the [`VersionControl`] collaborator, so an
//! interrupted run leaves nothing to reconcile.

use std::path::{Path, PathBuf};

use crules_fs::layout::RulesPath;

use crate::rejection::{PushRejection, classify_push_failure, is_merge_conflict};
use crate::vcs::{ConfigScope, VersionControl};
use crate::{Error, Result};

/// Identity keys a commit needs.
pub const IDENTITY_KEYS: [&str; 2] = ["user.name", "user.email"];

/// How [`Mirror::ensure`] brought the cache up to date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    /// The cache did not exist and was cloned
    Cloned,
    /// The cache was fast-forwarded from its upstream
    Pulled,
    /// Pull failed; remote refs were fetched but the working tree is unchanged
    FetchedOnly { reason: String },
    /// Neither pull nor fetch succeeded; the existing cache is used as-is
    Stale { reason: String },
}

impl Refresh {
    /// Warning text for degraded refreshes.
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::FetchedOnly { reason } => {
                Some(format!("Could not pull latest changes, using fetched state: {}", reason))
            }
            Self::Stale { reason } => {
                Some(format!("Could not update cache, using existing copy: {}", reason))
            }
            _ => None,
        }
    }
}

/// Which path a successful push took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushRecovery {
    /// The first push was accepted
    Direct,
    /// The branch had no upstream and was published with `--set-upstream`
    SetUpstream,
    /// The remote was ahead; local commits were rebased and pushed again
    Rebased,
}

/// A remote repository cached at `cache_dir`.
pub struct Mirror<'a> {
    vcs: &'a dyn VersionControl,
    url: String,
    cache_dir: PathBuf,
}

impl<'a> Mirror<'a> {
    pub fn new(vcs: &'a dyn VersionControl, url: impl Into<String>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            vcs,
            url: url.into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// The mirrored `.cursor` tree inside the cache.
    pub fn content_dir(&self) -> PathBuf {
        self.cache_dir.join(RulesPath::CursorDir.as_str())
    }

    /// Clone the cache if absent, otherwise update it.
    ///
    /// A failed pull degrades to a fetch, and a failed fetch degrades to the
    /// existing copy. Only a failed clone, or a cache directory that is not a
    /// repository, is an error.
    pub fn ensure(&self) -> Result<Refresh> {
        if !self.cache_dir.exists() || is_empty_dir(&self.cache_dir) {
            tracing::info!(url = %self.url, cache_dir = %self.cache_dir.display(), "Cloning rule repository");
            self.vcs
                .clone_repo(&self.url, &self.cache_dir)
                .map_err(|e| Error::CloneFailed {
                    url: self.url.clone(),
                    message: e.to_string(),
                })?;
            return Ok(Refresh::Cloned);
        }

        if !self.cache_dir.join(".git").exists() {
            return Err(Error::RefreshFailed {
                cache_dir: self.cache_dir.clone(),
                message: "directory exists but is not a git repository".to_string(),
            });
        }

        tracing::debug!(cache_dir = %self.cache_dir.display(), "Pulling latest changes");
        let pull_err = match self.vcs.pull(&self.cache_dir) {
            Ok(()) => return Ok(Refresh::Pulled),
            Err(e) => e,
        };

        tracing::warn!(error = %pull_err, "Pull failed, falling back to fetch");
        match self.vcs.fetch(&self.cache_dir) {
            Ok(()) => Ok(Refresh::FetchedOnly {
                reason: pull_err.to_string(),
            }),
            Err(fetch_err) => {
                tracing::warn!(error = %fetch_err, "Fetch failed, using existing cache");
                Ok(Refresh::Stale {
                    reason: fetch_err.to_string(),
                })
            }
        }
    }

    /// Whether the cache has no uncommitted changes.
    pub fn is_clean(&self) -> Result<bool> {
        Ok(self.vcs.status(&self.cache_dir)?.is_empty())
    }

    /// Make sure commits in the cache have an author.
    ///
    /// Each key is looked up in the cache's local config, then the global
    /// config. Failing both, the value in effect for `invoking_dir` is copied
    /// into the cache's local config.
    pub fn ensure_identity(&self, invoking_dir: &Path) -> Result<()> {
        let mut missing = Vec::new();

        for key in IDENTITY_KEYS {
            if self.vcs.config_get(key, ConfigScope::Local, &self.cache_dir)?.is_some()
                || self.vcs.config_get(key, ConfigScope::Global, &self.cache_dir)?.is_some()
            {
                continue;
            }

            match self.vcs.config_get(key, ConfigScope::Effective, invoking_dir)? {
                Some(value) => {
                    tracing::debug!(key, "Copying identity from invoking directory");
                    self.vcs.config_set(key, &value, &self.cache_dir)?;
                }
                None => missing.push(key.to_string()),
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::NoIdentity { missing })
        }
    }

    /// Stage the mirrored tree, commit it and push.
    pub fn commit_and_push(&self, message: &str) -> Result<PushRecovery> {
        let pathspec = format!("{}/", RulesPath::CursorDir.as_str());
        self.vcs.add(&self.cache_dir, &pathspec)?;
        self.vcs.commit(&self.cache_dir, message)?;
        let recovery = self.push_with_retry()?;
        tracing::info!(?recovery, "Pushed rule changes");
        Ok(recovery)
    }

    /// Push, recovering once from a missing upstream or a remote that is ahead.
    pub fn push_with_retry(&self) -> Result<PushRecovery> {
        let err = match self.vcs.push(&self.cache_dir) {
            Ok(()) => return Ok(PushRecovery::Direct),
            Err(e) => e,
        };
        if !matches!(err, Error::CommandFailed { .. }) {
            return Err(err);
        }

        match classify_push_failure(&err.command_output()) {
            PushRejection::MissingUpstream => {
                tracing::debug!("No upstream branch, pushing with --set-upstream");
                self.vcs.push_set_upstream(&self.cache_dir)?;
                Ok(PushRecovery::SetUpstream)
            }
            PushRejection::NonFastForward => {
                tracing::debug!("Remote is ahead, rebasing before retry");
                self.integrate_remote()?;
                self.vcs.push(&self.cache_dir)?;
                Ok(PushRecovery::Rebased)
            }
            PushRejection::Other => Err(err),
        }
    }

    fn integrate_remote(&self) -> Result<()> {
        self.vcs.pull_rebase(&self.cache_dir).map_err(|e| {
            let output = format!("{}\n{}", e.command_output(), e);
            if is_merge_conflict(&output) {
                Error::MergeConflict {
                    cache_dir: self.cache_dir.clone(),
                }
            } else {
                Error::IntegrationFailed {
                    message: e.to_string(),
                }
            }
        })
    }
}

fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_warning_only_for_degraded_states() {
        assert_eq!(Refresh::Cloned.warning(), None);
        assert_eq!(Refresh::Pulled.warning(), None);
        assert!(
            Refresh::FetchedOnly { reason: "offline".into() }
                .warning()
                .unwrap()
                .contains("offline")
        );
        assert!(Refresh::Stale { reason: "x".into() }.warning().is_some());
    }
}
