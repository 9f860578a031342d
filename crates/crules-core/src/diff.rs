//! Line diffs of a single rule file
//!
//! Built on `similar`. The mirror side is the old text and the working
//! tree side is the new text.

use std::path::Path;

use similar::{ChangeTag, TextDiff};

use crules_fs::io::read_optional;
use crules_fs::{NormalizedPath, RulesPath, compute_content_checksum};
use crules_git::VersionControl;

use crate::config::Profile;
use crate::remote::open_mirror;
use crate::{Error, Result};

/// Maximum lines shown per file when reviewing a push.
pub const REVIEW_LINE_LIMIT: usize = 100;

/// One line of a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Only in the working tree
    Added(String),
    /// Only in the mirror
    Removed(String),
    /// In both
    Context(String),
}

/// Comparison of one file between the working tree and the mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDiff {
    /// Present in the mirror only; carries the mirror content
    DeletedInProject(String),
    /// Present in the working tree only; carries the local content
    NewInProject(String),
    Identical,
    Changed(Vec<DiffLine>),
}

/// Diff `old` against `new` line by line.
///
/// Unchanged lines are included only when `include_unchanged` is set.
/// Line terminators are stripped.
pub fn line_diff(old: &str, new: &str, include_unchanged: bool) -> Vec<DiffLine> {
    TextDiff::from_lines(old, new)
        .iter_all_changes()
        .filter_map(|change| {
            let text = change.value().trim_end_matches(['\n', '\r']).to_string();
            match change.tag() {
                ChangeTag::Insert => Some(DiffLine::Added(text)),
                ChangeTag::Delete => Some(DiffLine::Removed(text)),
                ChangeTag::Equal if include_unchanged => Some(DiffLine::Context(text)),
                ChangeTag::Equal => None,
            }
        })
        .collect()
}

/// Compare bytes from both sides of one file.
pub fn compare(mirror: Option<&[u8]>, local: Option<&[u8]>, verbose: bool) -> Option<FileDiff> {
    match (mirror, local) {
        (None, None) => None,
        (Some(mirror), None) => Some(FileDiff::DeletedInProject(
            String::from_utf8_lossy(mirror).to_string(),
        )),
        (None, Some(local)) => Some(FileDiff::NewInProject(
            String::from_utf8_lossy(local).to_string(),
        )),
        (Some(mirror), Some(local)) => {
            if compute_content_checksum(mirror) == compute_content_checksum(local) {
                Some(FileDiff::Identical)
            } else {
                Some(FileDiff::Changed(line_diff(
                    &String::from_utf8_lossy(mirror),
                    &String::from_utf8_lossy(local),
                    verbose,
                )))
            }
        }
    }
}

/// Refresh the mirror and diff `<cwd>/.cursor/<path>` against it.
///
/// # Errors
///
/// [`Error::FileNotFound`] when neither side has the file.
pub fn diff_file(
    profile: &Profile,
    cwd: &Path,
    vcs: &dyn VersionControl,
    path: &str,
    verbose: bool,
) -> Result<FileDiff> {
    let relative = NormalizedPath::new(path);
    if !relative.is_contained() {
        tracing::warn!(path, "Refusing to diff a path outside .cursor");
        return Err(Error::FileNotFound {
            path: path.to_string(),
        });
    }

    let ready = open_mirror(profile, vcs)?;
    let mirror = read_optional(relative.under(&ready.content_dir()));
    let local = read_optional(relative.under(&cwd.join(RulesPath::CursorDir.as_str())));

    compare(mirror.as_deref(), local.as_deref(), verbose).ok_or_else(|| Error::FileNotFound {
        path: relative.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_diff_hides_context_unless_verbose() {
        let old = "one\ntwo\nthree\n";
        let new = "one\n2\nthree\n";

        assert_eq!(
            line_diff(old, new, false),
            vec![DiffLine::Removed("two".into()), DiffLine::Added("2".into())]
        );
        assert_eq!(
            line_diff(old, new, true),
            vec![
                DiffLine::Context("one".into()),
                DiffLine::Removed("two".into()),
                DiffLine::Added("2".into()),
                DiffLine::Context("three".into()),
            ]
        );
    }

    #[test]
    fn test_compare_outcomes() {
        assert_eq!(compare(None, None, false), None);
        assert_eq!(compare(Some(&b"X"[..]), Some(&b"X"[..]), true), Some(FileDiff::Identical));
        assert_eq!(
            compare(Some(&b"X"[..]), None, false),
            Some(FileDiff::DeletedInProject("X".into()))
        );
        assert_eq!(
            compare(None, Some(&b"L"[..]), false),
            Some(FileDiff::NewInProject("L".into()))
        );
        assert!(matches!(
            compare(Some(&b"a\n"[..]), Some(&b"b\n"[..]), false),
            Some(FileDiff::Changed(lines)) if lines.len() == 2
        ));
    }
}
