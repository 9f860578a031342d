//! Sync and push against a real bare remote

use crules_core::{AcceptAll, PushOptions, PushOutcome, SyncOptions, Workspace};
use crules_git::GitCli;
use crules_test_utils::TestWorkspace;
use crules_test_utils::git::{
    configure_identity, last_commit_subject, read_remote_file, real_git_repo, seeded_remote,
};
use pretty_assertions::assert_eq;

fn setup() -> (TestWorkspace, std::path::PathBuf, Workspace) {
    let ws = TestWorkspace::new();
    let remote = seeded_remote(
        ws.root(),
        &[
            (".cursor/rules/a.mdc", "X\n"),
            (".cursor/docs/guide.md", "Guide\n"),
        ],
    );
    ws.configure_repository(&remote);
    // The invoking directory supplies the commit identity
    real_git_repo(&ws.project());
    configure_identity(&ws.project());
    let workspace = Workspace::new(&ws.home(), &ws.project(), Box::new(GitCli::new()));
    (ws, remote, workspace)
}

#[test]
fn test_sync_then_push_round_trip() {
    let (ws, remote, workspace) = setup();
    ws.write_rule("rules/project-notes.mdc", "keep me");

    let report = workspace.sync(&SyncOptions::default()).unwrap();
    assert_eq!(report.copied, 2);
    assert_eq!(report.preserved, 1);
    ws.assert_rule_contains("rules/a.mdc", "X");

    ws.write_rule("rules/a.mdc", "X2\n");
    ws.write_rule("rules/b.mdc", "B\n");
    let pushed = workspace
        .push(&PushOptions::default(), &mut AcceptAll)
        .unwrap();

    assert!(matches!(pushed.outcome, PushOutcome::Pushed { .. }));
    assert_eq!(read_remote_file(&remote, ".cursor/rules/a.mdc").as_deref(), Some("X2\n"));
    assert_eq!(read_remote_file(&remote, ".cursor/rules/b.mdc").as_deref(), Some("B\n"));
    assert_eq!(read_remote_file(&remote, ".cursor/rules/project-notes.mdc"), None);
    assert_eq!(
        last_commit_subject(&remote),
        "Update cursor rules: 1 added, 1 modified, 0 deleted"
    );

    let again = workspace
        .push(&PushOptions::default(), &mut AcceptAll)
        .unwrap();
    assert_eq!(again.outcome, PushOutcome::NothingToDo);
}

#[test]
fn test_repeated_sync_leaves_nothing_to_push() {
    let (ws, _remote, workspace) = setup();

    workspace.sync(&SyncOptions::default()).unwrap();
    workspace.sync(&SyncOptions::default()).unwrap();

    assert!(workspace.status().unwrap().changes.is_empty());
    ws.assert_rule_contains("docs/guide.md", "Guide");
}
