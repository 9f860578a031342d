//! [`TestWorkspace`]: an isolated home directory and project directory.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::git::write_files;

/// A temporary directory holding `home/` and `project/`, plus room for
/// remotes and scratch clones.
///
/// # Example
///
/// ```rust,no_run
/// use crules_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.write_rule("rules/project-notes.mdc", "keep me");
/// ws.assert_rule_contains("rules/project-notes.mdc", "keep me");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("home")).unwrap();
        fs::create_dir_all(temp_dir.path().join("project")).unwrap();
        Self { temp_dir }
    }

    /// The temporary root, for remotes and scratch clones.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Stand-in for the user's home directory.
    pub fn home(&self) -> PathBuf {
        self.root().join("home")
    }

    /// The invoking working directory.
    pub fn project(&self) -> PathBuf {
        self.root().join("project")
    }

    /// Default cache location under the fake home.
    pub fn default_cache(&self) -> PathBuf {
        self.home().join(".cursor-rules-cache")
    }

    /// Write `<project>/.cursor/<rel>`.
    pub fn write_rule(&self, rel: &str, content: &str) {
        write_files(&self.project().join(".cursor"), &[(rel, content)]);
    }

    /// Read `<project>/.cursor/<rel>`, `None` if absent.
    pub fn read_rule(&self, rel: &str) -> Option<String> {
        fs::read_to_string(self.project().join(".cursor").join(rel)).ok()
    }

    pub fn write_global_config(&self, json: &str) {
        fs::write(self.home().join(".cursor-rules.json"), json).unwrap();
    }

    pub fn write_local_config(&self, json: &str) {
        fs::write(self.project().join(".cursor-rules.json"), json).unwrap();
    }

    pub fn read_global_config(&self) -> Option<String> {
        fs::read_to_string(self.home().join(".cursor-rules.json")).ok()
    }

    pub fn read_local_config(&self) -> Option<String> {
        fs::read_to_string(self.project().join(".cursor-rules.json")).ok()
    }

    /// Point the default profile (global document) at `repository`.
    pub fn configure_repository(&self, repository: &Path) {
        let json = format!(
            "{{\n  \"active\": \"default\",\n  \"profiles\": {{\n    \"default\": {{ \"repository\": {:?} }}\n  }}\n}}\n",
            repository.to_string_lossy()
        );
        self.write_global_config(&json);
    }

    /// # Panics
    /// Panics if `<project>/.cursor/<rel>` does not exist.
    pub fn assert_rule_exists(&self, rel: &str) {
        let path = self.project().join(".cursor").join(rel);
        assert!(path.exists(), "Expected rule file to exist: {}", path.display());
    }

    /// # Panics
    /// Panics if `<project>/.cursor/<rel>` exists.
    pub fn assert_rule_not_exists(&self, rel: &str) {
        let path = self.project().join(".cursor").join(rel);
        assert!(!path.exists(), "Expected rule file NOT to exist: {}", path.display());
    }

    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_rule_contains(&self, rel: &str, content: &str) {
        let path = self.project().join(".cursor").join(rel);
        let actual = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()));
        assert!(
            actual.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path.display(),
            content,
            actual
        );
    }
}
