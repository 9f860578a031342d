//! [`VersionControl`] backed by the `git` executable and libgit2
//!
//! Network and history-writing operations shell out to `git` so that the
//! user's credential helpers, hooks and rebase machinery apply. Read-only
//! queries (status, config) and local config writes go through `git2`.

use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{ConfigLevel, ErrorCode, Repository, Status, StatusOptions};

use crate::vcs::{ConfigScope, StatusEntry, VersionControl};
use crate::{Error, Result};

/// Git collaborator that runs the `git` CLI.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Use `git` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }

    /// Use a specific git executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run git with `args` in `cwd`, returning stdout on success.
    fn run(&self, cwd: &Path, args: &[&str]) -> Result<String> {
        let command = format!("git {}", args.join(" "));
        tracing::debug!(cwd = %cwd.display(), %command, "Running git");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|source| Error::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if output.status.success() {
            Ok(stdout)
        } else {
            Err(Error::CommandFailed {
                command,
                code: output.status.code().unwrap_or(-1),
                stdout,
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }
}

/// Map a libgit2 status to its two-character porcelain code.
fn porcelain_code(status: Status) -> String {
    if status.is_conflicted() {
        return "UU".to_string();
    }
    if status.is_wt_new() && !status.intersects(Status::INDEX_NEW | Status::INDEX_MODIFIED) {
        return "??".to_string();
    }

    let index = if status.is_index_new() {
        'A'
    } else if status.is_index_modified() {
        'M'
    } else if status.is_index_deleted() {
        'D'
    } else if status.is_index_renamed() {
        'R'
    } else if status.is_index_typechange() {
        'T'
    } else {
        ' '
    };
    let worktree = if status.is_wt_modified() {
        'M'
    } else if status.is_wt_deleted() {
        'D'
    } else if status.is_wt_renamed() {
        'R'
    } else if status.is_wt_typechange() {
        'T'
    } else {
        ' '
    };
    format!("{}{}", index, worktree)
}

/// Read a string key, mapping "not set" to `None`.
fn get_string(config: &git2::Config, key: &str) -> Result<Option<String>> {
    match config.get_string(key) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read a key from one level of a config, `None` if the level has no file.
fn get_at_level(config: &git2::Config, level: ConfigLevel, key: &str) -> Result<Option<String>> {
    match config.open_level(level) {
        Ok(level_config) => get_string(&level_config, key),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl VersionControl for GitCli {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let parent = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        std::fs::create_dir_all(parent).map_err(|e| crules_fs::Error::io(parent, e))?;

        let dest_str = dest.to_string_lossy();
        self.run(parent, &["clone", url, dest_str.as_ref()])?;
        Ok(())
    }

    fn pull(&self, cwd: &Path) -> Result<()> {
        self.run(cwd, &["pull"]).map(|_| ())
    }

    fn pull_rebase(&self, cwd: &Path) -> Result<()> {
        self.run(cwd, &["pull", "--rebase"]).map(|_| ())
    }

    fn fetch(&self, cwd: &Path) -> Result<()> {
        self.run(cwd, &["fetch", "origin"]).map(|_| ())
    }

    fn status(&self, cwd: &Path) -> Result<Vec<StatusEntry>> {
        let repo = Repository::open(cwd)?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = repo.statuses(Some(&mut opts))?;
        Ok(statuses
            .iter()
            .filter(|entry| entry.status() != Status::CURRENT)
            .map(|entry| {
                StatusEntry::new(
                    porcelain_code(entry.status()),
                    entry.path().unwrap_or_default(),
                )
            })
            .collect())
    }

    fn add(&self, cwd: &Path, pathspec: &str) -> Result<()> {
        self.run(cwd, &["add", pathspec]).map(|_| ())
    }

    fn commit(&self, cwd: &Path, message: &str) -> Result<()> {
        self.run(cwd, &["commit", "-m", message]).map(|_| ())
    }

    fn push(&self, cwd: &Path) -> Result<()> {
        self.run(cwd, &["push"]).map(|_| ())
    }

    fn push_set_upstream(&self, cwd: &Path) -> Result<()> {
        self.run(cwd, &["push", "--set-upstream", "origin", "HEAD"])
            .map(|_| ())
    }

    fn config_get(&self, key: &str, scope: ConfigScope, cwd: &Path) -> Result<Option<String>> {
        match scope {
            ConfigScope::Local => {
                let repo = Repository::open(cwd)?;
                get_at_level(&repo.config()?, ConfigLevel::Local, key)
            }
            ConfigScope::Global => {
                let config = git2::Config::open_default()?;
                match get_at_level(&config, ConfigLevel::Global, key)? {
                    Some(value) => Ok(Some(value)),
                    None => get_at_level(&config, ConfigLevel::XDG, key),
                }
            }
            ConfigScope::Effective => match Repository::open(cwd) {
                Ok(repo) => get_string(&repo.config()?, key),
                // Not a repository: only user and system config apply
                Err(e) if e.code() == ErrorCode::NotFound => {
                    get_string(&git2::Config::open_default()?, key)
                }
                Err(e) => Err(e.into()),
            },
        }
    }

    fn config_set(&self, key: &str, value: &str, cwd: &Path) -> Result<()> {
        let repo = Repository::open(cwd)?;
        let mut local = repo.config()?.open_level(ConfigLevel::Local)?;
        local.set_str(key, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_porcelain_codes() {
        assert_eq!(porcelain_code(Status::WT_NEW), "??");
        assert_eq!(porcelain_code(Status::WT_MODIFIED), " M");
        assert_eq!(porcelain_code(Status::INDEX_NEW), "A ");
        assert_eq!(porcelain_code(Status::INDEX_MODIFIED | Status::WT_MODIFIED), "MM");
        assert_eq!(porcelain_code(Status::WT_DELETED), " D");
        assert_eq!(porcelain_code(Status::CONFLICTED), "UU");
    }

    #[test]
    fn test_status_lists_untracked_files() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        std::fs::create_dir_all(temp.path().join(".cursor/rules")).unwrap();
        std::fs::write(temp.path().join(".cursor/rules/a.mdc"), "X").unwrap();

        let entries = GitCli::new().status(temp.path()).unwrap();
        assert_eq!(entries, vec![StatusEntry::new("??", ".cursor/rules/a.mdc")]);
    }

    #[test]
    fn test_config_set_then_get_local() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let git = GitCli::new();

        assert_eq!(git.config_get("crules.test", ConfigScope::Local, temp.path()).unwrap(), None);
        git.config_set("crules.test", "yes", temp.path()).unwrap();
        assert_eq!(
            git.config_get("crules.test", ConfigScope::Local, temp.path()).unwrap(),
            Some("yes".to_string())
        );
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let temp = TempDir::new().unwrap();
        let git = GitCli::with_program("/nonexistent/git-binary");
        let err = git.fetch(temp.path()).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }
}
