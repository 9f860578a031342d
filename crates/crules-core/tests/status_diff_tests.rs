//! Status and diff scenarios

use crules_core::config::Profile;
use crules_core::diff::diff_file;
use crules_core::status::status;
use crules_core::{ChangeKind, DiffLine, Error, FileDiff};
use crules_test_utils::{FakeVcs, TestWorkspace};
use pretty_assertions::assert_eq;

fn profile(ws: &TestWorkspace) -> Profile {
    Profile {
        repository: "https://example.com/rules.git".to_string(),
        ..Profile::builtin(&ws.home())
    }
}

#[test]
fn test_status_without_local_cursor_dir_reports_deletion() {
    let ws = TestWorkspace::new();
    let vcs = FakeVcs::new().with_remote_file(".cursor/rules/a.mdc", "X");

    let report = status(&profile(&ws), &ws.project(), &vcs).unwrap();

    assert_eq!(report.changes.kind_of(&"rules/a.mdc".into()), Some(ChangeKind::Deleted));
    assert_eq!(report.changes.added.len(), 0);
    assert_eq!(report.changes.modified.len(), 0);
    assert_eq!(report.changes.deleted.len(), 1);
}

#[test]
fn test_identical_file_is_unchanged_and_diff_is_identical() {
    let ws = TestWorkspace::new();
    ws.write_rule("rules/a.mdc", "same\n");
    let vcs = FakeVcs::new().with_remote_file(".cursor/rules/a.mdc", "same\n");
    let profile = profile(&ws);

    let report = status(&profile, &ws.project(), &vcs).unwrap();
    assert_eq!(report.changes.kind_of(&"rules/a.mdc".into()), Some(ChangeKind::Unchanged));

    let diff = diff_file(&profile, &ws.project(), &vcs, "rules/a.mdc", true).unwrap();
    assert_eq!(diff, FileDiff::Identical);
}

#[test]
fn test_diff_reports_each_side() {
    let ws = TestWorkspace::new();
    ws.write_rule("rules/local.mdc", "L");
    ws.write_rule("rules/both.mdc", "keep\nlocal\n");
    let vcs = FakeVcs::new()
        .with_remote_file(".cursor/rules/remote.mdc", "R")
        .with_remote_file(".cursor/rules/both.mdc", "keep\nremote\n");
    let profile = profile(&ws);
    let diff = |path: &str| diff_file(&profile, &ws.project(), &vcs, path, false);

    assert_eq!(diff("rules/local.mdc").unwrap(), FileDiff::NewInProject("L".into()));
    assert_eq!(
        diff("rules/remote.mdc").unwrap(),
        FileDiff::DeletedInProject("R".into())
    );
    assert_eq!(
        diff("rules/both.mdc").unwrap(),
        FileDiff::Changed(vec![
            DiffLine::Removed("remote".into()),
            DiffLine::Added("local".into()),
        ])
    );
    assert!(matches!(
        diff("rules/nowhere.mdc").unwrap_err(),
        Error::FileNotFound { ref path } if path == "rules/nowhere.mdc"
    ));
}

#[test]
fn test_diff_refuses_paths_outside_cursor_dir() {
    let ws = TestWorkspace::new();
    std::fs::write(ws.project().join("outside.txt"), "not a rule").unwrap();
    ws.write_rule("rules/a.mdc", "A");
    let vcs = FakeVcs::new().with_remote_file(".cursor/rules/a.mdc", "A");
    let profile = profile(&ws);

    for path in ["../outside.txt", "rules/../../outside.txt", "/etc/passwd"] {
        let err = diff_file(&profile, &ws.project(), &vcs, path, false).unwrap_err();
        assert!(
            matches!(err, Error::FileNotFound { path: ref reported } if reported == path),
            "{path}: {err}"
        );
    }
    assert!(vcs.calls().is_empty());
}
