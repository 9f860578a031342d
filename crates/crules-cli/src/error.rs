//! Error types for crules-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from crules-core
    #[error(transparent)]
    Core(#[from] crules_core::Error),

    /// Error from crules-fs
    #[error(transparent)]
    Fs(#[from] crules_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Remediation hints printed under the error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Core(e) => e.suggestions(),
            _ => Vec::new(),
        }
    }
}

impl From<crules_core::ConfigError> for CliError {
    fn from(e: crules_core::ConfigError) -> Self {
        Self::Core(e.into())
    }
}
