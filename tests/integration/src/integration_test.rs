//! Two collaborators sharing one rules repository
//!
//! Each collaborator has their own home (config and cache) and project
//! directory. Everything goes through a real bare remote and the `git` CLI.

use std::fs;
use std::path::{Path, PathBuf};

use crules_core::{AcceptAll, PushOptions, PushOutcome, SyncOptions, Workspace};
use crules_git::{GitCli, PushRecovery};
use crules_test_utils::git::{
    configure_identity, last_commit_subject, push_to_remote, read_remote_file, real_git_repo,
    seeded_remote,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

struct Collaborator {
    project: PathBuf,
    workspace: Workspace,
}

impl Collaborator {
    fn join(root: &Path, name: &str, remote: &Path) -> Self {
        let home = root.join(name).join("home");
        let project = root.join(name).join("project");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&project).unwrap();
        fs::write(
            home.join(".cursor-rules.json"),
            format!(
                "{{ \"profiles\": {{ \"default\": {{ \"repository\": {:?} }} }} }}",
                remote.to_string_lossy()
            ),
        )
        .unwrap();
        real_git_repo(&project);
        configure_identity(&project);
        let workspace = Workspace::new(&home, &project, Box::new(GitCli::new()));
        Self { project, workspace }
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.project.join(".cursor").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn read(&self, rel: &str) -> Option<String> {
        fs::read_to_string(self.project.join(".cursor").join(rel)).ok()
    }

    fn remove(&self, rel: &str) {
        fs::remove_file(self.project.join(".cursor").join(rel)).unwrap();
    }

    fn sync(&self) {
        self.workspace.sync(&SyncOptions::default()).unwrap();
    }

    fn push(&self) -> PushOutcome {
        self.workspace
            .push(&PushOptions::default(), &mut AcceptAll)
            .unwrap()
            .outcome
    }
}

fn shared_remote(root: &Path) -> PathBuf {
    seeded_remote(
        root,
        &[
            (".cursor/rules/style.mdc", "Use four spaces\n"),
            (".cursor/docs/readme.md", "Shared docs\n"),
        ],
    )
}

#[test]
fn test_push_from_one_reaches_the_other() {
    let root = TempDir::new().unwrap();
    let remote = shared_remote(root.path());
    let alice = Collaborator::join(root.path(), "alice", &remote);
    let bob = Collaborator::join(root.path(), "bob", &remote);

    alice.sync();
    bob.sync();
    bob.write("rules/project-bob.mdc", "Bob's own notes\n");

    alice.write("rules/testing.mdc", "Write tests first\n");
    assert!(matches!(alice.push(), PushOutcome::Pushed { .. }));

    bob.sync();
    assert_eq!(bob.read("rules/testing.mdc").as_deref(), Some("Write tests first\n"));
    assert_eq!(bob.read("rules/project-bob.mdc").as_deref(), Some("Bob's own notes\n"));
    assert!(bob.workspace.status().unwrap().changes.is_empty());
}

#[test]
fn test_unsynced_working_tree_wins_over_remote_edits() {
    let root = TempDir::new().unwrap();
    let remote = shared_remote(root.path());
    let alice = Collaborator::join(root.path(), "alice", &remote);
    let bob = Collaborator::join(root.path(), "bob", &remote);
    alice.sync();
    bob.sync();

    alice.write("rules/style.mdc", "Use tabs\n");
    assert!(matches!(alice.push(), PushOutcome::Pushed { .. }));

    // Bob never synced Alice's edit, so his copy of style.mdc reads as a change
    bob.write("docs/readme.md", "Shared docs, revised\n");
    let changes = bob.workspace.status().unwrap().changes;
    assert_eq!(changes.modified.len(), 2);

    assert!(matches!(bob.push(), PushOutcome::Pushed { .. }));
    assert_eq!(
        read_remote_file(&remote, ".cursor/rules/style.mdc").as_deref(),
        Some("Use four spaces\n")
    );
    assert_eq!(
        read_remote_file(&remote, ".cursor/docs/readme.md").as_deref(),
        Some("Shared docs, revised\n")
    );
}

#[test]
fn test_deletion_reaches_remote_but_not_other_working_trees() {
    let root = TempDir::new().unwrap();
    let remote = shared_remote(root.path());
    let alice = Collaborator::join(root.path(), "alice", &remote);
    let bob = Collaborator::join(root.path(), "bob", &remote);
    alice.sync();
    bob.sync();

    alice.remove("docs/readme.md");
    assert!(matches!(alice.push(), PushOutcome::Pushed { .. }));
    assert_eq!(read_remote_file(&remote, ".cursor/docs/readme.md"), None);
    assert_eq!(
        last_commit_subject(&remote),
        "Update cursor rules: 0 added, 0 modified, 1 deleted"
    );

    // Sync never removes files, so Bob's copy now reads as a local addition
    bob.sync();
    assert_eq!(bob.read("docs/readme.md").as_deref(), Some("Shared docs\n"));
    let changes = bob.workspace.status().unwrap().changes;
    assert_eq!(changes.added.len(), 1);
    assert!(changes.modified.is_empty());
}

#[test]
fn test_push_removes_files_missing_from_working_tree() {
    let root = TempDir::new().unwrap();
    let remote = shared_remote(root.path());
    let alice = Collaborator::join(root.path(), "alice", &remote);
    alice.sync();

    // Someone else pushes straight to the remote after Alice's last sync
    push_to_remote(
        &remote,
        &root.path().join("scratch"),
        &[(".cursor/rules/other.mdc", "From elsewhere\n")],
        "Add other rule",
    );

    alice.write("rules/mine.mdc", "Mine\n");
    match alice.push() {
        PushOutcome::Pushed { recovery, .. } => assert_eq!(recovery, PushRecovery::Direct),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(read_remote_file(&remote, ".cursor/rules/mine.mdc").as_deref(), Some("Mine\n"));
    assert_eq!(read_remote_file(&remote, ".cursor/rules/other.mdc"), None);
}
