//! Configuration profiles, fully resolved and partial

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::pattern::{DEFAULT_PROTECTED_PATTERN, ProtectedPattern};
use crules_fs::layout::DEFAULT_CACHE_DIR_NAME;

/// Name of the profile that always exists.
pub const DEFAULT_ALIAS: &str = "default";

/// Commit message used when a profile does not set one.
pub const DEFAULT_COMMIT_TEMPLATE: &str = "Update cursor rules: {summary}";

/// Placeholder replaced by the change summary in commit messages.
pub const SUMMARY_PLACEHOLDER: &str = "{summary}";

/// A fully resolved profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub alias: String,
    /// Remote repository URL, empty when not configured
    pub repository: String,
    pub cache_dir: PathBuf,
    pub protected_pattern: String,
    pub commit_message_template: String,
}

impl Profile {
    /// The built-in `default` profile for a user whose home is `home`.
    pub fn builtin(home: &Path) -> Self {
        Self {
            alias: DEFAULT_ALIAS.to_string(),
            repository: String::new(),
            cache_dir: home.join(DEFAULT_CACHE_DIR_NAME),
            protected_pattern: DEFAULT_PROTECTED_PATTERN.to_string(),
            commit_message_template: DEFAULT_COMMIT_TEMPLATE.to_string(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.alias == DEFAULT_ALIAS
    }

    pub fn has_repository(&self) -> bool {
        !self.repository.trim().is_empty()
    }

    /// Compiled protected pattern; an invalid stored pattern falls back to the default.
    pub fn protected(&self) -> ProtectedPattern {
        ProtectedPattern::compile_or_default(&self.protected_pattern).0
    }

    /// Commit message with `{summary}` substituted.
    pub fn commit_message(&self, summary: &str) -> String {
        self.commit_message_template
            .replace(SUMMARY_PLACEHOLDER, summary)
    }

    /// Display value of one field.
    pub fn field(&self, key: ProfileKey) -> String {
        match key {
            ProfileKey::Repository => self.repository.clone(),
            ProfileKey::CacheDir => self.cache_dir.display().to_string(),
            ProfileKey::ProtectedPattern => self.protected_pattern.clone(),
            ProfileKey::CommitMessageTemplate => self.commit_message_template.clone(),
        }
    }

    /// Every field written out, for copying a resolved profile into a document.
    pub fn to_partial(&self) -> PartialProfile {
        PartialProfile {
            repository: Some(self.repository.clone()),
            cache_dir: Some(self.cache_dir.display().to_string()),
            protected_pattern: Some(self.protected_pattern.clone()),
            commit_message_template: Some(self.commit_message_template.clone()),
            extra: BTreeMap::new(),
        }
    }
}

/// The settable fields of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKey {
    Repository,
    CacheDir,
    ProtectedPattern,
    CommitMessageTemplate,
}

impl ProfileKey {
    pub const ALL: [ProfileKey; 4] = [
        Self::Repository,
        Self::CacheDir,
        Self::ProtectedPattern,
        Self::CommitMessageTemplate,
    ];

    /// Canonical document key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::CacheDir => "cacheDir",
            Self::ProtectedPattern => "protectedPattern",
            Self::CommitMessageTemplate => "commitMessageTemplate",
        }
    }
}

impl FromStr for ProfileKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repository" => Ok(Self::Repository),
            "cacheDir" => Ok(Self::CacheDir),
            "protectedPattern" | "projectSpecificPattern" => Ok(Self::ProtectedPattern),
            "commitMessageTemplate" | "commitMessage" => Ok(Self::CommitMessageTemplate),
            _ => Err(ConfigError::UnknownKey { key: s.to_string() }),
        }
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A profile as stored in one document: any field may be absent.
///
/// Keys this version does not know are kept in `extra` and written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,

    #[serde(
        default,
        alias = "projectSpecificPattern",
        skip_serializing_if = "Option::is_none"
    )]
    pub protected_pattern: Option<String>,

    #[serde(default, alias = "commitMessage", skip_serializing_if = "Option::is_none")]
    pub commit_message_template: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PartialProfile {
    /// Field-wise merge where values set in `self` win over `base`.
    pub fn merged_over(&self, base: &PartialProfile) -> PartialProfile {
        let mut extra = base.extra.clone();
        extra.extend(self.extra.clone());
        PartialProfile {
            repository: self.repository.clone().or_else(|| base.repository.clone()),
            cache_dir: self.cache_dir.clone().or_else(|| base.cache_dir.clone()),
            protected_pattern: self
                .protected_pattern
                .clone()
                .or_else(|| base.protected_pattern.clone()),
            commit_message_template: self
                .commit_message_template
                .clone()
                .or_else(|| base.commit_message_template.clone()),
            extra,
        }
    }

    pub fn get(&self, key: ProfileKey) -> Option<&str> {
        match key {
            ProfileKey::Repository => self.repository.as_deref(),
            ProfileKey::CacheDir => self.cache_dir.as_deref(),
            ProfileKey::ProtectedPattern => self.protected_pattern.as_deref(),
            ProfileKey::CommitMessageTemplate => self.commit_message_template.as_deref(),
        }
    }

    pub fn set(&mut self, key: ProfileKey, value: impl Into<String>) {
        let value = Some(value.into());
        match key {
            ProfileKey::Repository => self.repository = value,
            ProfileKey::CacheDir => self.cache_dir = value,
            ProfileKey::ProtectedPattern => self.protected_pattern = value,
            ProfileKey::CommitMessageTemplate => self.commit_message_template = value,
        }
    }
}

/// Alias syntax: a letter followed by letters, digits, `-` or `_`.
pub fn is_valid_alias(alias: &str) -> bool {
    let mut chars = alias.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        _ => false,
    }
}
