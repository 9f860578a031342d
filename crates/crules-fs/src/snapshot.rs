//! Point-in-time snapshots of a directory tree
//!
//! A [`Snapshot`] maps every regular file under a root to its content, keyed by
//! the normalized path relative to that root. Snapshots are cheap to rebuild
//! and are never persisted.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{NormalizedPath, checksum, io};

/// Relative-path to content mapping from a single directory scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    root: PathBuf,
    files: BTreeMap<NormalizedPath, Vec<u8>>,
}

impl Snapshot {
    /// Scan `root` recursively.
    ///
    /// A missing root yields an empty snapshot. Entries that cannot be walked
    /// or read are logged and left out, so an unreadable file looks deleted.
    pub fn scan(root: &Path) -> Self {
        let mut files = BTreeMap::new();

        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "Snapshot root missing; empty snapshot");
            return Self {
                root: root.to_path_buf(),
                files,
            };
        }

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unwalkable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            if let Some(content) = io::read_optional(entry.path()) {
                files.insert(NormalizedPath::new(relative), content);
            }
        }

        tracing::debug!(root = %root.display(), files = files.len(), "Snapshot taken");
        Self {
            root: root.to_path_buf(),
            files,
        }
    }

    /// Build a snapshot from in-memory entries.
    pub fn from_entries<I, P, C>(root: impl Into<PathBuf>, entries: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<NormalizedPath>,
        C: Into<Vec<u8>>,
    {
        Self {
            root: root.into(),
            files: entries
                .into_iter()
                .map(|(path, content)| (path.into(), content.into()))
                .collect(),
        }
    }

    /// Directory this snapshot was taken from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, path: &NormalizedPath) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &NormalizedPath) -> bool {
        self.files.contains_key(path)
    }

    /// Digest of a file's content, if present.
    pub fn digest(&self, path: &NormalizedPath) -> Option<String> {
        self.get(path).map(checksum::compute_content_checksum)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over `(path, content)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&NormalizedPath, &[u8])> {
        self.files.iter().map(|(p, c)| (p, c.as_slice()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.files.keys()
    }
}
