//! Profile operations over layered documents
//!
//! Every operation re-reads the documents it needs. Mutations follow
//! read-merge-write on exactly one document, leaving unrelated keys intact.

use std::path::{Path, PathBuf};

use crules_fs::expand_home;

use crate::Result;
use crate::error::ConfigError;
use crate::pattern::{DEFAULT_PROTECTED_PATTERN, ProtectedPattern};

use super::backend::{DocumentBackend, FileBackend, Scope};
use super::document::Document;
use super::merge::{ResolvedConfig, derived_cache_dir, merge_documents, resolve};
use super::profile::{
    DEFAULT_ALIAS, DEFAULT_COMMIT_TEMPLATE, PartialProfile, Profile, ProfileKey, is_valid_alias,
};

/// Result of [`ConfigStore::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub profile: Profile,
    /// Non-fatal problems, such as a protected pattern that was replaced
    pub warnings: Vec<String>,
}

/// The configuration store for one invocation.
pub struct ConfigStore<B: DocumentBackend = FileBackend> {
    backend: B,
    home: PathBuf,
}

impl ConfigStore<FileBackend> {
    /// Store over `<home>/.cursor-rules.json` and `<cwd>/.cursor-rules.json`.
    pub fn open(home: &Path, cwd: &Path) -> Self {
        Self::new(FileBackend::new(home, cwd), home)
    }
}

impl<B: DocumentBackend> ConfigStore<B> {
    pub fn new(backend: B, home: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            home: home.into(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Load a document for reading, skipping it with a warning if unusable.
    fn load_lenient(&self, scope: Scope) -> Option<Document> {
        let value = match self.backend.load(scope) {
            Ok(value) => value?,
            Err(e) => {
                tracing::warn!(scope = %scope, error = %e, "Skipping unreadable configuration document");
                return None;
            }
        };
        match Document::from_value(value) {
            Ok(document) => {
                tracing::debug!(scope = %scope, profiles = document.profiles.len(), "Loaded configuration document");
                Some(document)
            }
            Err(e) => {
                tracing::warn!(
                    scope = %scope,
                    path = %self.backend.location(scope).display(),
                    error = %e,
                    "Skipping malformed configuration document"
                );
                None
            }
        }
    }

    /// Load a document that is about to be rewritten.
    ///
    /// An absent document is empty; an unparseable one is an error.
    fn load_for_write(&self, scope: Scope) -> Result<Document> {
        let malformed = |message: String| ConfigError::Malformed {
            path: self.backend.location(scope),
            message,
        };
        match self.backend.load(scope) {
            Ok(Some(value)) => Ok(Document::from_value(value).map_err(|e| malformed(e.to_string()))?),
            Ok(None) => Ok(Document::default()),
            Err(crules_fs::Error::Parse { message, .. }) => Err(malformed(message).into()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, scope: Scope, document: &Document) -> Result<()> {
        self.backend.save(scope, document)?;
        Ok(())
    }

    /// The raw document in one scope, if present and parseable.
    pub fn document(&self, scope: Scope) -> Option<Document> {
        self.load_lenient(scope)
    }

    /// Merge both documents over the built-in defaults.
    pub fn resolve(&self) -> ResolvedConfig {
        let global = self.load_lenient(Scope::Global);
        let local = self.load_lenient(Scope::Local);
        resolve(&merge_documents(global.as_ref(), local.as_ref()), &self.home)
    }

    /// A profile by alias, or the active profile when `alias` is `None`.
    pub fn get(&self, alias: Option<&str>) -> Option<Profile> {
        let resolved = self.resolve();
        match alias {
            Some(alias) => resolved.get(alias).cloned(),
            None => Some(resolved.active_profile().clone()),
        }
    }

    /// Every profile in alias order, flagged when active.
    pub fn list(&self) -> Vec<(Profile, bool)> {
        let resolved = self.resolve();
        resolved
            .profiles
            .values()
            .map(|profile| (profile.clone(), profile.alias == resolved.active))
            .collect()
    }

    /// One field of a profile (the active one when `alias` is `None`).
    pub fn value(&self, alias: Option<&str>, key: &str) -> Result<String> {
        let key: ProfileKey = key.parse()?;
        let profile = self.require(alias)?;
        Ok(profile.field(key))
    }

    fn require(&self, alias: Option<&str>) -> Result<Profile> {
        self.get(alias).ok_or_else(|| {
            ConfigError::NotFound {
                alias: alias.unwrap_or(DEFAULT_ALIAS).to_string(),
            }
            .into()
        })
    }

    /// Point `scope`'s document at `alias`.
    pub fn set_active(&self, alias: &str, scope: Scope) -> Result<()> {
        if !self.resolve().contains(alias) {
            return Err(ConfigError::NotFound {
                alias: alias.to_string(),
            }
            .into());
        }
        let mut document = self.load_for_write(scope)?;
        document.active = Some(alias.to_string());
        self.save(scope, &document)?;
        tracing::debug!(alias, scope = %scope, "Switched active profile");
        Ok(())
    }

    /// Add a profile to `scope`'s document.
    ///
    /// Unset fields are written with their defaults; an omitted cache
    /// directory is derived from the alias. An invalid protected pattern is
    /// replaced by the default and reported in the outcome's warnings.
    pub fn create(&self, alias: &str, fields: PartialProfile, scope: Scope) -> Result<CreateOutcome> {
        let resolved = self.resolve();
        validate_new_alias(alias, &resolved)?;

        let mut warnings = Vec::new();
        let pattern = match fields.protected_pattern.as_deref() {
            Some(source) => {
                let (pattern, warning) = ProtectedPattern::compile_or_default(source);
                warnings.extend(warning);
                pattern.as_str().to_string()
            }
            None => DEFAULT_PROTECTED_PATTERN.to_string(),
        };

        let cache_dir = fields
            .cache_dir
            .clone()
            .unwrap_or_else(|| resolved.derived_cache_dir(alias).display().to_string());

        let profile = PartialProfile {
            repository: Some(fields.repository.clone().unwrap_or_default()),
            cache_dir: Some(cache_dir),
            protected_pattern: Some(pattern),
            commit_message_template: Some(
                fields
                    .commit_message_template
                    .clone()
                    .unwrap_or_else(|| DEFAULT_COMMIT_TEMPLATE.to_string()),
            ),
            extra: fields.extra,
        };

        let mut document = self.load_for_write(scope)?;
        document.profiles.insert(alias.to_string(), profile);
        self.save(scope, &document)?;
        tracing::debug!(alias, scope = %scope, "Created profile");

        let profile = self.require(Some(alias))?;
        Ok(CreateOutcome { profile, warnings })
    }

    /// Remove a profile from `scope`'s document.
    pub fn delete(&self, alias: &str, scope: Scope) -> Result<()> {
        if alias == DEFAULT_ALIAS {
            return Err(ConfigError::ReservedAlias {
                alias: alias.to_string(),
            }
            .into());
        }
        if self.resolve().active == alias {
            return Err(ConfigError::ActiveProfile {
                alias: alias.to_string(),
            }
            .into());
        }

        let mut document = self.load_for_write(scope)?;
        if document.profiles.remove(alias).is_none() {
            return Err(ConfigError::NotFound {
                alias: alias.to_string(),
            }
            .into());
        }
        // Overridden by the other scope, but must not dangle once that changes
        if document.active.as_deref() == Some(alias) {
            document.active = Some(DEFAULT_ALIAS.to_string());
        }
        self.save(scope, &document)?;
        tracing::debug!(alias, scope = %scope, "Deleted profile");
        Ok(())
    }

    /// Rename a profile defined in `scope`'s document.
    ///
    /// A cache directory that was unset or still the derived location of
    /// `old` moves to the derived location of `new`. Any document whose
    /// active pointer names `old` is updated.
    pub fn rename(&self, old: &str, new: &str, scope: Scope) -> Result<()> {
        if old == DEFAULT_ALIAS {
            return Err(ConfigError::ReservedAlias {
                alias: old.to_string(),
            }
            .into());
        }
        let resolved = self.resolve();
        validate_new_alias(new, &resolved)?;

        let mut document = self.load_for_write(scope)?;
        let Some(mut profile) = document.profiles.remove(old) else {
            return Err(ConfigError::NotFound {
                alias: old.to_string(),
            }
            .into());
        };

        let old_derived = resolved.derived_cache_dir(old);
        let follows_alias = match profile.cache_dir.as_deref() {
            None => true,
            Some(raw) => expand_home(raw, &self.home) == old_derived,
        };
        if follows_alias {
            let new_derived = derived_cache_dir(&resolved.default_profile().cache_dir, new);
            profile.cache_dir = Some(new_derived.display().to_string());
        }

        document.profiles.insert(new.to_string(), profile);
        if document.active.as_deref() == Some(old) {
            document.active = Some(new.to_string());
        }
        self.save(scope, &document)?;

        let other = scope.other();
        if let Some(mut other_document) = self.load_lenient(other)
            && other_document.active.as_deref() == Some(old)
        {
            other_document.active = Some(new.to_string());
            self.save(other, &other_document)?;
        }

        tracing::debug!(old, new, scope = %scope, "Renamed profile");
        Ok(())
    }

    /// Set one field of a profile in `scope`'s document.
    ///
    /// A profile that `scope` does not define yet is first copied there with
    /// all of its currently resolved values.
    pub fn set_field(&self, alias: &str, key: &str, value: &str, scope: Scope) -> Result<()> {
        let key: ProfileKey = key.parse()?;
        let profile = self.require(Some(alias))?;

        if key == ProfileKey::ProtectedPattern
            && let Err(e) = ProtectedPattern::compile(value)
        {
            return Err(ConfigError::InvalidPattern {
                pattern: value.to_string(),
                message: e.to_string(),
            }
            .into());
        }

        let mut document = self.load_for_write(scope)?;
        let entry = document
            .profiles
            .entry(alias.to_string())
            .or_insert_with(|| {
                tracing::debug!(alias, scope = %scope, "Copying inherited profile into document");
                profile.to_partial()
            });
        entry.set(key, value);
        self.save(scope, &document)?;
        tracing::debug!(alias, key = %key, scope = %scope, "Updated profile field");
        Ok(())
    }
}

fn validate_new_alias(alias: &str, resolved: &ResolvedConfig) -> Result<()> {
    if alias == DEFAULT_ALIAS {
        return Err(ConfigError::ReservedAlias {
            alias: alias.to_string(),
        }
        .into());
    }
    if !is_valid_alias(alias) {
        return Err(ConfigError::InvalidAlias {
            alias: alias.to_string(),
        }
        .into());
    }
    if resolved.contains(alias) {
        return Err(ConfigError::AlreadyExists {
            alias: alias.to_string(),
        }
        .into());
    }
    Ok(())
}
