//! Working tree status against the mirror

use std::path::{Path, PathBuf};

use crules_fs::{RulesPath, Snapshot};
use crules_git::{Refresh, VersionControl};

use crate::Result;
use crate::changeset::ChangeSet;
use crate::config::Profile;
use crate::remote::open_mirror;

/// Local changes relative to the refreshed mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub changes: ChangeSet,
    pub refresh: Refresh,
    pub mirror_dir: PathBuf,
    pub working_dir: PathBuf,
}

/// Refresh the mirror and classify the working tree against it.
///
/// Protected files are left out of every category.
pub fn status(profile: &Profile, cwd: &Path, vcs: &dyn VersionControl) -> Result<StatusReport> {
    let ready = open_mirror(profile, vcs)?;
    let mirror_dir = ready.content_dir();
    let working_dir = cwd.join(RulesPath::CursorDir.as_str());

    let pattern = profile.protected();
    let changes = ChangeSet::compute(
        &Snapshot::scan(&mirror_dir),
        &Snapshot::scan(&working_dir),
        |path| pattern.matches_path(path),
    );

    Ok(StatusReport {
        changes,
        refresh: ready.refresh,
        mirror_dir,
        working_dir,
    })
}
