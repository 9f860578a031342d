//! Error types for crules-core

use std::path::PathBuf;

/// Result type for crules-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of configuration store operations.
///
/// All of these are detected before anything is written.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A document exists but cannot be parsed; it is never overwritten
    #[error("Configuration document at {path} is malformed: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Profile '{alias}' not found")]
    NotFound { alias: String },

    #[error("Profile '{alias}' is reserved and cannot be created, deleted or renamed")]
    ReservedAlias { alias: String },

    #[error("Invalid profile name '{alias}'")]
    InvalidAlias { alias: String },

    #[error("Profile '{alias}' already exists")]
    AlreadyExists { alias: String },

    #[error("Profile '{alias}' is currently active")]
    ActiveProfile { alias: String },

    #[error("Unknown configuration key '{key}'")]
    UnknownKey { key: String },

    #[error("Invalid protected pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Errors that can occur in crules-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The active profile has no repository URL
    #[error("No repository configured for profile '{alias}'")]
    RepositoryNotConfigured { alias: String },

    /// The mirror was refreshed but holds no `.cursor` directory
    #[error("Source .cursor directory not found in repository (expected {path})")]
    MirrorContentMissing { path: PathBuf },

    /// Neither the working tree nor the mirror has the requested file
    #[error("File not found in project or repository: {path}")]
    FileNotFound { path: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from crules-fs
    #[error(transparent)]
    Fs(#[from] crules_fs::Error),

    /// Git error from crules-git
    #[error(transparent)]
    Git(#[from] crules_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Remediation hints suitable for showing to a user.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Git(e) => e.suggestions(),
            Self::RepositoryNotConfigured { .. } => vec![
                "Set one with: crules config set repository <url>".to_string(),
                "Or create a profile: crules config create <alias> -r <url>".to_string(),
            ],
            Self::MirrorContentMissing { .. } => vec![
                "The repository must contain a .cursor directory at its root".to_string(),
            ],
            Self::FileNotFound { .. } => vec![
                "Paths are relative to .cursor, e.g. rules/example.mdc".to_string(),
            ],
            Self::Config(ConfigError::Malformed { path, .. }) => vec![format!(
                "Fix or remove {} and try again",
                path.display()
            )],
            Self::Config(ConfigError::NotFound { .. }) => {
                vec!["List profiles with: crules config list".to_string()]
            }
            Self::Config(ConfigError::InvalidAlias { .. }) => vec![
                "Names start with a letter and contain only letters, digits, '-' and '_'"
                    .to_string(),
            ],
            Self::Config(ConfigError::ActiveProfile { .. }) => {
                vec!["Switch first with: crules config use default".to_string()]
            }
            Self::Config(ConfigError::UnknownKey { .. }) => vec![
                "Valid keys: repository, cacheDir, protectedPattern, commitMessageTemplate"
                    .to_string(),
            ],
            _ => Vec::new(),
        }
    }
}
