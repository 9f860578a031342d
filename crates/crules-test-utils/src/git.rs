//! Git fixtures backed by the real `git` executable.
//!
//! Commits are made with an inline identity (`-c user.name=...`) so that the
//! fixtures work on machines without a global git config.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const TEST_NAME: &str = "Test User";
pub const TEST_EMAIL: &str = "test@test.com";

/// Run `git` in `cwd` and return stdout.
///
/// # Panics
/// Panics if git cannot be spawned or exits non-zero.
pub fn run_git(cwd: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", &format!("user.name={TEST_NAME}")])
        .args(["-c", &format!("user.email={TEST_EMAIL}")])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(cwd)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .unwrap_or_else(|e| panic!("run_git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "run_git: `git {args:?}` failed in {}:\n{}",
            cwd.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Initialises a real git repository using `git2` (no commits, no config).
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Write the commit identity into a repository's local config.
pub fn configure_identity(repo: &Path) {
    run_git(repo, &["config", "user.name", TEST_NAME]);
    run_git(repo, &["config", "user.email", TEST_EMAIL]);
    run_git(repo, &["config", "commit.gpgsign", "false"]);
}

/// Write `files` (paths relative to `root`) to disk, creating parents.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("write_files: failed to create {}: {e}", parent.display()));
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("write_files: failed to write {}: {e}", path.display()));
    }
}

/// Create a bare repository at `<dir>/remote.git` whose `main` branch holds
/// one commit containing `files`.
///
/// File paths are relative to the repository root, so rule files are given
/// as `.cursor/rules/a.mdc`.
pub fn seeded_remote(dir: &Path, files: &[(&str, &str)]) -> PathBuf {
    let remote = dir.join("remote.git");
    fs::create_dir_all(&remote).unwrap_or_else(|e| panic!("seeded_remote: {e}"));
    run_git(&remote, &["init", "--bare"]);
    run_git(&remote, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    let seed = dir.join("seed");
    fs::create_dir_all(&seed).unwrap_or_else(|e| panic!("seeded_remote: {e}"));
    run_git(&seed, &["init"]);
    run_git(&seed, &["checkout", "-b", "main"]);
    write_files(&seed, files);
    if files.is_empty() {
        write_files(&seed, &[("README.md", "# Rules\n")]);
    }
    run_git(&seed, &["add", "."]);
    run_git(&seed, &["commit", "-m", "Initial rules"]);
    let remote_str = remote.to_string_lossy().to_string();
    run_git(&seed, &["remote", "add", "origin", &remote_str]);
    run_git(&seed, &["push", "origin", "main"]);

    fs::remove_dir_all(&seed).unwrap_or_else(|e| panic!("seeded_remote: {e}"));
    remote
}

/// Commit `files` to `remote`'s `main` branch from a throwaway clone, as
/// another collaborator would.
pub fn push_to_remote(remote: &Path, scratch: &Path, files: &[(&str, &str)], message: &str) {
    let remote_str = remote.to_string_lossy().to_string();
    let scratch_str = scratch.to_string_lossy().to_string();
    let parent = scratch.parent().unwrap_or(Path::new("."));
    run_git(parent, &["clone", &remote_str, &scratch_str]);
    write_files(scratch, files);
    run_git(scratch, &["add", "."]);
    run_git(scratch, &["commit", "-m", message]);
    run_git(scratch, &["push", "origin", "HEAD"]);
}

/// Read a file from the tip of `main` in a bare repository.
pub fn read_remote_file(remote: &Path, rel: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["show", &format!("main:{rel}")])
        .current_dir(remote)
        .output()
        .unwrap_or_else(|e| panic!("read_remote_file: {e}"));
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).to_string())
}

/// Subject line of the latest commit on `main` in a bare repository.
pub fn last_commit_subject(remote: &Path) -> String {
    run_git(remote, &["log", "-1", "--format=%s", "main"])
        .trim()
        .to_string()
}
