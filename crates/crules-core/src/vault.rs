//! Protected File Vault
//!
//! Holds the protected files of the working tree while a sync overwrites it.

use std::collections::BTreeMap;
use std::path::Path;

use crules_fs::io::write_atomic;
use crules_fs::{NormalizedPath, RulesPath, Snapshot};

use crate::Result;
use crate::pattern::ProtectedPattern;

/// In-memory copy of protected files, keyed relative to `.cursor`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vault {
    files: BTreeMap<NormalizedPath, Vec<u8>>,
}

impl Vault {
    /// Capture every protected file under `rules`, `commands` and `docs` of
    /// `cursor_dir`, including files inside protected directories.
    pub fn capture(cursor_dir: &Path, pattern: &ProtectedPattern) -> Self {
        let mut files = BTreeMap::new();

        for dir in RulesPath::PROTECTED_DIRS {
            let snapshot = Snapshot::scan(&cursor_dir.join(dir));
            for (path, content) in snapshot.iter() {
                if pattern.matches_path(path) {
                    let key = NormalizedPath::new(dir.as_str()).join(path.as_str());
                    files.insert(key, content.to_vec());
                }
            }
        }

        tracing::debug!(files = files.len(), "Backed up protected files");
        Self { files }
    }

    /// Write every captured file back under `cursor_dir`.
    ///
    /// The `rules`, `commands` and `docs` directories are created even when
    /// the vault is empty. Returns the number of files restored.
    pub fn restore(&self, cursor_dir: &Path) -> Result<usize> {
        for dir in RulesPath::PROTECTED_DIRS {
            let path = cursor_dir.join(dir);
            std::fs::create_dir_all(&path).map_err(|e| crules_fs::Error::io(&path, e))?;
        }
        for (path, content) in &self.files {
            write_atomic(path.under(cursor_dir), content)?;
        }
        tracing::debug!(files = self.files.len(), "Restored protected files");
        Ok(self.files.len())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.files.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crules_test_utils::git::write_files;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_captures_only_protected_files_in_known_dirs() {
        let temp = TempDir::new().unwrap();
        write_files(
            temp.path(),
            &[
                ("rules/project-notes.mdc", "keep me"),
                ("rules/shared.mdc", "shared"),
                ("commands/nested/project-cmd.md", "cmd"),
                ("rules/project-team/inner.mdc", "inner"),
                ("docs/project-doc.md", "doc"),
                ("other/project-elsewhere.md", "ignored"),
                ("project-root.md", "ignored"),
            ],
        );

        let vault = Vault::capture(temp.path(), &ProtectedPattern::default());
        let paths: Vec<_> = vault.paths().map(|p| p.as_str().to_string()).collect();

        assert_eq!(
            paths,
            vec![
                "commands/nested/project-cmd.md",
                "docs/project-doc.md",
                "rules/project-notes.mdc",
                "rules/project-team/inner.mdc"
            ]
        );
    }

    #[test]
    fn test_restore_overwrites_and_creates_dirs() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &[("rules/project-notes.mdc", "keep me")]);
        let vault = Vault::capture(temp.path(), &ProtectedPattern::default());

        std::fs::write(temp.path().join("rules/project-notes.mdc"), "clobbered").unwrap();
        assert_eq!(vault.restore(temp.path()).unwrap(), 1);

        assert_eq!(
            std::fs::read_to_string(temp.path().join("rules/project-notes.mdc")).unwrap(),
            "keep me"
        );
        assert!(temp.path().join("commands").is_dir());
        assert!(temp.path().join("docs").is_dir());
    }
}
