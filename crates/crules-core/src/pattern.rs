//! Protected-file pattern matching

use regex::Regex;

use crules_fs::NormalizedPath;

/// Pattern used when none is configured or the configured one does not compile.
pub const DEFAULT_PROTECTED_PATTERN: &str = "^project-";

/// A compiled protected-file pattern, matched against file and directory names.
#[derive(Debug, Clone)]
pub struct ProtectedPattern {
    regex: Regex,
}

impl ProtectedPattern {
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(source)?,
        })
    }

    /// Compile `source`, falling back to [`DEFAULT_PROTECTED_PATTERN`].
    ///
    /// The second value is a warning describing the fallback, if one happened.
    pub fn compile_or_default(source: &str) -> (Self, Option<String>) {
        match Self::compile(source) {
            Ok(pattern) => (pattern, None),
            Err(e) => {
                let warning = format!(
                    "Invalid protected pattern '{}' ({}), using '{}'",
                    source, e, DEFAULT_PROTECTED_PATTERN
                );
                tracing::warn!(pattern = source, error = %e, "Falling back to default protected pattern");
                (Self::default(), Some(warning))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether a single file or directory name is protected.
    pub fn matches_name(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Whether `path` is protected: its base name or the name of any
    /// directory above it matches.
    ///
    /// Sync never descends into a protected directory, so everything below
    /// one is protected too.
    pub fn matches_path(&self, path: &NormalizedPath) -> bool {
        path.as_str()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .any(|segment| self.matches_name(segment))
    }
}

impl Default for ProtectedPattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_PROTECTED_PATTERN).unwrap_or_else(|_| unreachable!()),
        }
    }
}
