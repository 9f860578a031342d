//! Invocation context
//!
//! Resolves the directories a command runs against.

use std::path::PathBuf;

use crules_core::Workspace;

use crate::error::Result;

/// Per-invocation state shared by every command.
pub struct Context {
    pub workspace: Workspace,
}

impl Context {
    /// Build the workspace for the current directory.
    ///
    /// `home` overrides the user's home directory.
    pub fn new(home: Option<PathBuf>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let workspace = Workspace::discover(home, cwd)?;
        Ok(Self { workspace })
    }
}
