//! Well-known names in the working tree and the mirror.

use std::path::Path;

/// Name of the configuration document, both globally and per working directory.
pub const CONFIG_FILE_NAME: &str = ".cursor-rules.json";

/// Name of the default cache directory under the user's home.
pub const DEFAULT_CACHE_DIR_NAME: &str = ".cursor-rules-cache";

/// Standard paths shared by the working tree and the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesPath {
    /// The synced `.cursor` directory (in both working tree and mirror)
    CursorDir,
    /// `rules` sub-directory of `.cursor`
    Rules,
    /// `commands` sub-directory of `.cursor`
    Commands,
    /// `docs` sub-directory of `.cursor`
    Docs,
}

impl RulesPath {
    /// Sub-directories of `.cursor` whose protected files are backed up across a sync.
    pub const PROTECTED_DIRS: [RulesPath; 3] = [Self::Rules, Self::Commands, Self::Docs];

    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CursorDir => ".cursor",
            Self::Rules => "rules",
            Self::Commands => "commands",
            Self::Docs => "docs",
        }
    }
}

impl AsRef<Path> for RulesPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for RulesPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for RulesPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
