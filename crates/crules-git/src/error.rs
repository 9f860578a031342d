//! Error types for crules-git

use std::path::PathBuf;

/// Result type for crules-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in crules-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed (exit code {code}): {}", .stderr.trim())]
    CommandFailed {
        command: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("Failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    #[error("Failed to refresh mirror at {cache_dir}: {message}")]
    RefreshFailed { cache_dir: PathBuf, message: String },

    #[error("Merge conflict detected while integrating remote changes in {cache_dir}")]
    MergeConflict { cache_dir: PathBuf },

    #[error("Failed to pull remote changes: {message}")]
    IntegrationFailed { message: String },

    #[error("No commit identity configured (missing {})", .missing.join(", "))]
    NoIdentity { missing: Vec<String> },

    #[error("Filesystem error: {0}")]
    Fs(#[from] crules_fs::Error),
}

impl Error {
    /// Combined stdout and stderr of a failed command, empty for other errors.
    pub fn command_output(&self) -> String {
        match self {
            Self::CommandFailed { stdout, stderr, .. } => format!("{}\n{}", stdout, stderr),
            _ => String::new(),
        }
    }

    /// Remediation hints suitable for showing to a user.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Spawn { .. } => vec!["Make sure git is installed and on your PATH".to_string()],
            Self::CloneFailed { url, .. } => vec![
                format!("Check that {} is reachable", url),
                "Verify repository access permissions".to_string(),
            ],
            Self::RefreshFailed { cache_dir, .. } => vec![
                "Check your network connection".to_string(),
                format!(
                    "Remove {} to force a fresh clone on the next run",
                    cache_dir.display()
                ),
            ],
            Self::MergeConflict { cache_dir } => vec![
                format!("Cache directory: {}", cache_dir.display()),
                "Run: git status (in cache directory) to see conflicts".to_string(),
                "After resolving: git add . && git rebase --continue".to_string(),
                "Then run: crules push again".to_string(),
            ],
            Self::IntegrationFailed { .. } => vec![
                "Check your network connection".to_string(),
                "Verify repository access permissions".to_string(),
                "Try manually: git pull (in cache directory)".to_string(),
            ],
            Self::NoIdentity { .. } => vec![
                "git config --global user.name \"Your Name\"".to_string(),
                "git config --global user.email \"you@example.com\"".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}
