//! [`FakeVcs`]: a scripted, in-memory [`VersionControl`].
//!
//! Every call is appended to a log so tests can assert on the exact
//! sequence of git operations. Failures are scripted as stderr text and
//! surface as [`Error::CommandFailed`], the same shape the real
//! collaborator produces.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;

use crules_git::{ConfigScope, Error, Result, StatusEntry, VersionControl};

#[derive(Default)]
struct FakeState {
    calls: Vec<String>,
    remote_files: Vec<(String, String)>,
    push_failures: VecDeque<String>,
    set_upstream_failure: Option<String>,
    pull_failure: Option<String>,
    fetch_failure: Option<String>,
    rebase_failure: Option<String>,
    clone_failure: Option<String>,
    status: Vec<StatusEntry>,
    local_config: HashMap<String, String>,
    global_config: HashMap<String, String>,
    effective_config: HashMap<String, String>,
}

/// Scripted version-control collaborator.
///
/// By default every operation succeeds, status is clean and no identity is
/// configured anywhere.
#[derive(Default)]
pub struct FakeVcs {
    state: RefCell<FakeState>,
}

fn failed(command: &str, stderr: &str) -> Error {
    Error::CommandFailed {
        command: command.to_string(),
        code: 1,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

impl FakeVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A file that `clone_repo` writes into the destination.
    pub fn with_remote_file(self, rel: &str, content: &str) -> Self {
        self.state
            .borrow_mut()
            .remote_files
            .push((rel.to_string(), content.to_string()));
        self
    }

    /// Fail the next `push` with `stderr`. Calls queue up in order.
    pub fn with_push_failure(self, stderr: &str) -> Self {
        self.state.borrow_mut().push_failures.push_back(stderr.to_string());
        self
    }

    pub fn with_set_upstream_failure(self, stderr: &str) -> Self {
        self.state.borrow_mut().set_upstream_failure = Some(stderr.to_string());
        self
    }

    pub fn with_pull_failure(self, stderr: &str) -> Self {
        self.state.borrow_mut().pull_failure = Some(stderr.to_string());
        self
    }

    pub fn with_fetch_failure(self, stderr: &str) -> Self {
        self.state.borrow_mut().fetch_failure = Some(stderr.to_string());
        self
    }

    pub fn with_rebase_failure(self, stderr: &str) -> Self {
        self.state.borrow_mut().rebase_failure = Some(stderr.to_string());
        self
    }

    pub fn with_clone_failure(self, stderr: &str) -> Self {
        self.state.borrow_mut().clone_failure = Some(stderr.to_string());
        self
    }

    /// Report these entries from every `status` call.
    pub fn with_status(self, entries: Vec<StatusEntry>) -> Self {
        self.state.borrow_mut().status = entries;
        self
    }

    pub fn with_config(self, scope: ConfigScope, key: &str, value: &str) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let map = match scope {
                ConfigScope::Local => &mut state.local_config,
                ConfigScope::Global => &mut state.global_config,
                ConfigScope::Effective => &mut state.effective_config,
            };
            map.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Both identity keys in the global config.
    pub fn with_global_identity(self) -> Self {
        self.with_config(ConfigScope::Global, "user.name", "Test User")
            .with_config(ConfigScope::Global, "user.email", "test@test.com")
    }

    /// Every operation recorded so far, e.g. `"push"`, `"commit <msg>"`.
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    /// Whether any recorded call starts with `prefix`.
    pub fn called(&self, prefix: &str) -> bool {
        self.state.borrow().calls.iter().any(|c| c.starts_with(prefix))
    }

    /// A value written through `config_set`.
    pub fn local_config(&self, key: &str) -> Option<String> {
        self.state.borrow().local_config.get(key).cloned()
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl VersionControl for FakeVcs {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        self.record(format!("clone {url}"));
        if let Some(stderr) = self.state.borrow().clone_failure.clone() {
            return Err(failed("git clone", &stderr));
        }
        fs::create_dir_all(dest.join(".git")).unwrap();
        for (rel, content) in &self.state.borrow().remote_files {
            let path = dest.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        Ok(())
    }

    fn pull(&self, _cwd: &Path) -> Result<()> {
        self.record("pull".to_string());
        match self.state.borrow().pull_failure.clone() {
            Some(stderr) => Err(failed("git pull", &stderr)),
            None => Ok(()),
        }
    }

    fn pull_rebase(&self, _cwd: &Path) -> Result<()> {
        self.record("pull --rebase".to_string());
        match self.state.borrow().rebase_failure.clone() {
            Some(stderr) => Err(failed("git pull --rebase", &stderr)),
            None => Ok(()),
        }
    }

    fn fetch(&self, _cwd: &Path) -> Result<()> {
        self.record("fetch".to_string());
        match self.state.borrow().fetch_failure.clone() {
            Some(stderr) => Err(failed("git fetch origin", &stderr)),
            None => Ok(()),
        }
    }

    fn status(&self, _cwd: &Path) -> Result<Vec<StatusEntry>> {
        self.record("status".to_string());
        Ok(self.state.borrow().status.clone())
    }

    fn add(&self, _cwd: &Path, pathspec: &str) -> Result<()> {
        self.record(format!("add {pathspec}"));
        Ok(())
    }

    fn commit(&self, _cwd: &Path, message: &str) -> Result<()> {
        self.record(format!("commit {message}"));
        Ok(())
    }

    fn push(&self, _cwd: &Path) -> Result<()> {
        self.record("push".to_string());
        match self.state.borrow_mut().push_failures.pop_front() {
            Some(stderr) => Err(failed("git push", &stderr)),
            None => Ok(()),
        }
    }

    fn push_set_upstream(&self, _cwd: &Path) -> Result<()> {
        self.record("push --set-upstream".to_string());
        match self.state.borrow().set_upstream_failure.clone() {
            Some(stderr) => Err(failed("git push --set-upstream origin HEAD", &stderr)),
            None => Ok(()),
        }
    }

    fn config_get(&self, key: &str, scope: ConfigScope, _cwd: &Path) -> Result<Option<String>> {
        let state = self.state.borrow();
        let value = match scope {
            ConfigScope::Local => state.local_config.get(key),
            ConfigScope::Global => state.global_config.get(key),
            ConfigScope::Effective => state
                .effective_config
                .get(key)
                .or_else(|| state.global_config.get(key)),
        };
        Ok(value.cloned())
    }

    fn config_set(&self, key: &str, value: &str, _cwd: &Path) -> Result<()> {
        self.record(format!("config {key}"));
        self.state
            .borrow_mut()
            .local_config
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
