//! Classification of differences between two snapshots
//!
//! The reference snapshot is the mirror and the subject is the working tree.
//! Every path in either snapshot that the exclusion predicate does not
//! reject lands in exactly one category.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crules_fs::io::{remove_file_if_exists, write_atomic};
use crules_fs::{NormalizedPath, Snapshot, compute_content_checksum};

use crate::Result;

/// Category of a path in a [`ChangeSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Only in the subject
    Added,
    /// In both, with different content
    Modified,
    /// Only in the reference
    Deleted,
    /// In both, with the same content
    Unchanged,
}

/// Both sides of a modified path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub reference: Vec<u8>,
    pub subject: Vec<u8>,
}

/// Added/modified/deleted/unchanged classification of two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Subject content of paths missing from the reference
    pub added: BTreeMap<NormalizedPath, Vec<u8>>,
    pub modified: BTreeMap<NormalizedPath, Modification>,
    /// Reference content of paths missing from the subject
    pub deleted: BTreeMap<NormalizedPath, Vec<u8>>,
    pub unchanged: BTreeSet<NormalizedPath>,
}

impl ChangeSet {
    /// Compare `subject` against `reference`, ignoring paths for which
    /// `exclude` returns true.
    pub fn compute<F>(reference: &Snapshot, subject: &Snapshot, exclude: F) -> Self
    where
        F: Fn(&NormalizedPath) -> bool,
    {
        let mut changes = ChangeSet::default();

        for (path, content) in subject.iter() {
            if exclude(path) {
                continue;
            }
            match reference.get(path) {
                None => {
                    changes.added.insert(path.clone(), content.to_vec());
                }
                Some(reference_content) => {
                    if compute_content_checksum(content)
                        == compute_content_checksum(reference_content)
                    {
                        changes.unchanged.insert(path.clone());
                    } else {
                        changes.modified.insert(
                            path.clone(),
                            Modification {
                                reference: reference_content.to_vec(),
                                subject: content.to_vec(),
                            },
                        );
                    }
                }
            }
        }

        for (path, content) in reference.iter() {
            if !exclude(path) && !subject.contains(path) {
                changes.deleted.insert(path.clone(), content.to_vec());
            }
        }

        tracing::debug!(
            added = changes.added.len(),
            modified = changes.modified.len(),
            deleted = changes.deleted.len(),
            unchanged = changes.unchanged.len(),
            "Computed change set"
        );
        changes
    }

    /// True when nothing was added, modified or deleted.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// `"<a> added, <m> modified, <d> deleted"`
    pub fn summary(&self) -> String {
        format!(
            "{} added, {} modified, {} deleted",
            self.added.len(),
            self.modified.len(),
            self.deleted.len()
        )
    }

    pub fn kind_of(&self, path: &NormalizedPath) -> Option<ChangeKind> {
        if self.added.contains_key(path) {
            Some(ChangeKind::Added)
        } else if self.modified.contains_key(path) {
            Some(ChangeKind::Modified)
        } else if self.deleted.contains_key(path) {
            Some(ChangeKind::Deleted)
        } else if self.unchanged.contains(path) {
            Some(ChangeKind::Unchanged)
        } else {
            None
        }
    }

    /// Make `root` match the subject for every changed path.
    ///
    /// Added and modified content is written; deleted paths are removed,
    /// and a path that is already gone is not an error.
    pub fn apply_to(&self, root: &Path) -> Result<()> {
        for (path, content) in &self.added {
            write_atomic(path.under(root), content)?;
        }
        for (path, modification) in &self.modified {
            write_atomic(path.under(root), &modification.subject)?;
        }
        for path in self.deleted.keys() {
            if !remove_file_if_exists(path.under(root))? {
                tracing::debug!(path = %path, "Already deleted");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn snapshot(entries: &[(&str, &str)]) -> Snapshot {
        Snapshot::from_entries("/", entries.iter().map(|(p, c)| (*p, c.as_bytes())))
    }

    #[test]
    fn test_classifies_each_category() {
        let reference = snapshot(&[("rules/same.mdc", "S"), ("rules/edit.mdc", "old"), ("rules/gone.mdc", "G")]);
        let subject = snapshot(&[("rules/same.mdc", "S"), ("rules/edit.mdc", "new"), ("rules/new.mdc", "N")]);

        let changes = ChangeSet::compute(&reference, &subject, |_| false);

        assert_eq!(changes.kind_of(&"rules/same.mdc".into()), Some(ChangeKind::Unchanged));
        assert_eq!(changes.kind_of(&"rules/edit.mdc".into()), Some(ChangeKind::Modified));
        assert_eq!(changes.kind_of(&"rules/gone.mdc".into()), Some(ChangeKind::Deleted));
        assert_eq!(changes.kind_of(&"rules/new.mdc".into()), Some(ChangeKind::Added));
        assert_eq!(changes.summary(), "1 added, 1 modified, 1 deleted");
        assert_eq!(changes.modified[&NormalizedPath::from("rules/edit.mdc")].reference, b"old".to_vec());
    }

    #[test]
    fn test_excluded_paths_are_absent_from_every_category() {
        let reference = snapshot(&[("rules/project-a.mdc", "R")]);
        let subject = snapshot(&[("rules/project-notes.mdc", "keep me")]);

        let changes = ChangeSet::compute(&reference, &subject, |p| {
            p.file_name().is_some_and(|n| n.starts_with("project-"))
        });

        assert_eq!(changes, ChangeSet::default());
        assert!(changes.is_empty());
    }

    #[test]
    fn test_apply_writes_and_deletes() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("rules")).unwrap();
        std::fs::write(temp.path().join("rules/gone.mdc"), "G").unwrap();

        let reference = Snapshot::scan(temp.path());
        let subject = Snapshot::from_entries(temp.path(), [("rules/new/deep.mdc", "N".as_bytes())]);

        let changes = ChangeSet::compute(&reference, &subject, |_| false);
        changes.apply_to(temp.path()).unwrap();

        assert_eq!(std::fs::read_to_string(temp.path().join("rules/new/deep.mdc")).unwrap(), "N");
        assert!(!temp.path().join("rules/gone.mdc").exists());

        // A second application finds the deletion already done
        changes.apply_to(temp.path()).unwrap();
    }
}
