//! Bringing a profile's mirror up to date before comparing against it

use std::path::PathBuf;

use crules_git::{Mirror, Refresh, VersionControl};

use crate::config::Profile;
use crate::{Error, Result};

/// A refreshed mirror whose `.cursor` directory is known to exist.
pub struct ReadyMirror<'a> {
    pub mirror: Mirror<'a>,
    pub refresh: Refresh,
}

impl ReadyMirror<'_> {
    /// The mirrored `.cursor` directory.
    pub fn content_dir(&self) -> PathBuf {
        self.mirror.content_dir()
    }
}

/// Clone or update `profile`'s cache.
///
/// # Errors
///
/// [`Error::RepositoryNotConfigured`] when the profile has no repository URL,
/// [`Error::MirrorContentMissing`] when the repository has no `.cursor`
/// directory, and any clone failure.
pub fn open_mirror<'a>(profile: &Profile, vcs: &'a dyn VersionControl) -> Result<ReadyMirror<'a>> {
    if !profile.has_repository() {
        return Err(Error::RepositoryNotConfigured {
            alias: profile.alias.clone(),
        });
    }

    let mirror = Mirror::new(vcs, profile.repository.trim(), &profile.cache_dir);
    let refresh = mirror.ensure()?;
    if let Some(warning) = refresh.warning() {
        tracing::warn!(alias = %profile.alias, "{}", warning);
    }

    let content_dir = mirror.content_dir();
    if !content_dir.is_dir() {
        return Err(Error::MirrorContentMissing { path: content_dir });
    }

    tracing::debug!(alias = %profile.alias, cache_dir = %profile.cache_dir.display(), "Mirror ready");
    Ok(ReadyMirror { mirror, refresh })
}
