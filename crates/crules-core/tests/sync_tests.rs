//! Sync engine behaviour against a scripted collaborator

use crules_core::config::Profile;
use crules_core::{
    AcceptAll, Error, PushEngine, PushOptions, PushOutcome, SyncEngine, SyncOptions, SyncState,
    status::status,
};
use crules_fs::Snapshot;
use crules_git::Refresh;
use crules_test_utils::{FakeVcs, TestWorkspace};
use pretty_assertions::assert_eq;

fn profile(ws: &TestWorkspace) -> Profile {
    Profile {
        repository: "https://example.com/rules.git".to_string(),
        ..Profile::builtin(&ws.home())
    }
}

fn remote() -> FakeVcs {
    FakeVcs::new()
        .with_remote_file(".cursor/rules/a.mdc", "X")
        .with_remote_file(".cursor/rules/project-remote.mdc", "from mirror")
        .with_remote_file(".cursor/commands/c.md", "C")
}

#[test]
fn test_sync_copies_mirror_and_preserves_protected_files() {
    let ws = TestWorkspace::new();
    ws.write_rule("rules/a.mdc", "local edit");
    ws.write_rule("rules/project-notes.mdc", "keep me");
    let vcs = remote();
    let profile = profile(&ws);

    let mut engine = SyncEngine::new(&profile, ws.project(), &vcs);
    let report = engine.run(&SyncOptions::default()).unwrap();

    assert_eq!(engine.state(), SyncState::Done);
    assert_eq!(report.refresh, Refresh::Cloned);
    assert_eq!(report.copied, 2);
    assert_eq!(report.preserved, 1);
    assert!(!report.dry_run);
    ws.assert_rule_contains("rules/a.mdc", "X");
    ws.assert_rule_contains("commands/c.md", "C");
    ws.assert_rule_contains("rules/project-notes.mdc", "keep me");
    ws.assert_rule_not_exists("rules/project-remote.mdc");
    assert!(ws.project().join(".cursor/docs").is_dir());
}

#[test]
fn test_dry_run_writes_nothing() {
    let ws = TestWorkspace::new();
    ws.write_rule("rules/project-notes.mdc", "keep me");
    let vcs = remote();
    let profile = profile(&ws);

    let mut engine = SyncEngine::new(&profile, ws.project(), &vcs);
    let report = engine.run(&SyncOptions { dry_run: true }).unwrap();

    assert!(report.dry_run);
    assert_eq!(report.copied, 2);
    assert_eq!(report.preserved, 1);
    assert_eq!(engine.state(), SyncState::BackedUp);
    ws.assert_rule_not_exists("rules/a.mdc");
}

#[test]
fn test_protected_file_survives_mirror_copy_of_same_name() {
    let ws = TestWorkspace::new();
    ws.write_rule("rules/project-remote.mdc", "mine");
    let vcs = remote();
    let profile = profile(&ws);

    SyncEngine::new(&profile, ws.project(), &vcs)
        .run(&SyncOptions::default())
        .unwrap();

    assert_eq!(ws.read_rule("rules/project-remote.mdc").as_deref(), Some("mine"));
}

#[test]
fn test_second_sync_converges() {
    let ws = TestWorkspace::new();
    ws.write_rule("rules/project-notes.mdc", "keep me");
    let vcs = remote();
    let profile = profile(&ws);

    SyncEngine::new(&profile, ws.project(), &vcs)
        .run(&SyncOptions::default())
        .unwrap();
    let first = Snapshot::scan(&ws.project().join(".cursor"));

    let report = SyncEngine::new(&profile, ws.project(), &vcs)
        .run(&SyncOptions::default())
        .unwrap();
    let second = Snapshot::scan(&ws.project().join(".cursor"));

    assert_eq!(report.refresh, Refresh::Pulled);
    assert_eq!(first, second);
    assert!(status(&profile, &ws.project(), &vcs).unwrap().changes.is_empty());
}

#[test]
fn test_protected_mirror_directory_leaves_nothing_to_push() {
    let ws = TestWorkspace::new();
    let vcs = FakeVcs::new()
        .with_remote_file(".cursor/rules/a.mdc", "X")
        .with_remote_file(".cursor/rules/project-shared/inner.mdc", "team only");
    let profile = profile(&ws);

    for _ in 0..2 {
        let report = SyncEngine::new(&profile, ws.project(), &vcs)
            .run(&SyncOptions::default())
            .unwrap();
        assert_eq!(report.copied, 1);
    }
    ws.assert_rule_not_exists("rules/project-shared/inner.mdc");

    let changes = status(&profile, &ws.project(), &vcs).unwrap().changes;
    assert!(changes.is_empty(), "unexpected changes: {}", changes.summary());

    let pushed = PushEngine::new(&profile, ws.project(), &vcs)
        .run(&PushOptions { dry_run: true, force: false }, &mut AcceptAll)
        .unwrap();
    assert_eq!(pushed.outcome, PushOutcome::NothingToDo);
}

#[test]
fn test_missing_repository_fails_in_idle() {
    let ws = TestWorkspace::new();
    let vcs = FakeVcs::new();
    let profile = Profile::builtin(&ws.home());

    let mut engine = SyncEngine::new(&profile, ws.project(), &vcs);
    let err = engine.run(&SyncOptions::default()).unwrap_err();

    assert!(matches!(err, Error::RepositoryNotConfigured { .. }));
    assert_eq!(engine.state(), SyncState::Failed);
    assert_eq!(engine.failed_in(), Some(SyncState::Idle));
    assert!(vcs.calls().is_empty());
}

#[test]
fn test_repository_without_cursor_dir() {
    let ws = TestWorkspace::new();
    let vcs = FakeVcs::new().with_remote_file("README.md", "# not rules");
    let profile = profile(&ws);

    let mut engine = SyncEngine::new(&profile, ws.project(), &vcs);
    let err = engine.run(&SyncOptions::default()).unwrap_err();

    assert!(matches!(err, Error::MirrorContentMissing { .. }));
    assert_eq!(engine.failed_in(), Some(SyncState::Idle));
    assert!(!err.suggestions().is_empty());
}

#[test]
fn test_failed_pull_degrades_with_warning() {
    let ws = TestWorkspace::new();
    let profile = profile(&ws);
    crules_test_utils::git::write_files(
        &profile.cache_dir,
        &[(".git/HEAD", "ref: refs/heads/main\n"), (".cursor/rules/a.mdc", "cached")],
    );
    let vcs = FakeVcs::new().with_pull_failure("fatal: unable to access");

    let report = SyncEngine::new(&profile, ws.project(), &vcs)
        .run(&SyncOptions::default())
        .unwrap();

    assert!(matches!(report.refresh, Refresh::FetchedOnly { .. }));
    assert_eq!(report.warnings.len(), 1);
    ws.assert_rule_contains("rules/a.mdc", "cached");
}

#[test]
fn test_invalid_stored_pattern_falls_back_with_warning() {
    let ws = TestWorkspace::new();
    ws.write_rule("rules/project-notes.mdc", "keep me");
    let vcs = remote();
    let profile = Profile {
        protected_pattern: "([".to_string(),
        ..profile(&ws)
    };

    let report = SyncEngine::new(&profile, ws.project(), &vcs)
        .run(&SyncOptions::default())
        .unwrap();

    assert_eq!(report.preserved, 1);
    assert!(report.warnings.iter().any(|w| w.contains("([")));
}
