//! Pure layering of configuration documents
//!
//! Nothing here performs I/O. Precedence is built-in defaults < global <
//! local, per profile field, and local's `active` pointer wins over global's.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crules_fs::expand_home;

use super::document::Document;
use super::profile::{DEFAULT_ALIAS, PartialProfile, Profile};

/// Profiles and active pointer after layering, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedDocuments {
    pub active: Option<String>,
    pub profiles: BTreeMap<String, PartialProfile>,
}

/// Layer `local` over `global`.
pub fn merge_documents(global: Option<&Document>, local: Option<&Document>) -> MergedDocuments {
    let mut merged = MergedDocuments::default();

    for document in [global, local].into_iter().flatten() {
        if document.active.is_some() {
            merged.active = document.active.clone();
        }
        for (alias, profile) in &document.profiles {
            let layered = match merged.profiles.get(alias) {
                Some(base) => profile.merged_over(base),
                None => profile.clone(),
            };
            merged.profiles.insert(alias.clone(), layered);
        }
    }

    merged
}

/// The effective configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub profiles: BTreeMap<String, Profile>,
    /// Always names an entry of `profiles`
    pub active: String,
}

impl ResolvedConfig {
    pub fn active_profile(&self) -> &Profile {
        // `active` is validated at construction and `default` always exists
        &self.profiles[&self.active]
    }

    pub fn get(&self, alias: &str) -> Option<&Profile> {
        self.profiles.get(alias)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.profiles.contains_key(alias)
    }

    pub fn default_profile(&self) -> &Profile {
        &self.profiles[DEFAULT_ALIAS]
    }

    /// Cache location a non-default profile gets when it does not set one.
    pub fn derived_cache_dir(&self, alias: &str) -> PathBuf {
        derived_cache_dir(&self.default_profile().cache_dir, alias)
    }
}

pub fn derived_cache_dir(default_cache: &Path, alias: &str) -> PathBuf {
    default_cache.join(alias)
}

/// Apply built-in defaults to merged documents.
///
/// `default` is synthesized when absent. Non-default profiles whose cache
/// directory is unset or equal to the built-in one are given
/// `<default cache>/<alias>`. A dangling active pointer falls back to
/// `default`.
pub fn resolve(merged: &MergedDocuments, home: &Path) -> ResolvedConfig {
    let builtin = Profile::builtin(home);
    let empty = PartialProfile::default();

    let default_partial = merged.profiles.get(DEFAULT_ALIAS).unwrap_or(&empty);
    let default = apply_defaults(DEFAULT_ALIAS, default_partial, &builtin, home, None);

    let mut profiles = BTreeMap::new();
    for (alias, partial) in &merged.profiles {
        if alias == DEFAULT_ALIAS {
            continue;
        }
        let derived = derived_cache_dir(&default.cache_dir, alias);
        let profile = apply_defaults(alias, partial, &builtin, home, Some(derived));
        profiles.insert(alias.clone(), profile);
    }
    profiles.insert(DEFAULT_ALIAS.to_string(), default);

    let active = match merged.active.as_deref() {
        Some(alias) if profiles.contains_key(alias) => alias.to_string(),
        Some(alias) => {
            tracing::warn!(alias, "Active profile does not exist, using default");
            DEFAULT_ALIAS.to_string()
        }
        None => DEFAULT_ALIAS.to_string(),
    };

    ResolvedConfig { profiles, active }
}

fn apply_defaults(
    alias: &str,
    partial: &PartialProfile,
    builtin: &Profile,
    home: &Path,
    derived_cache: Option<PathBuf>,
) -> Profile {
    let explicit_cache = partial
        .cache_dir
        .as_deref()
        .map(|raw| expand_home(raw, home));
    let cache_dir = match (explicit_cache, derived_cache) {
        (Some(cache), Some(derived)) if cache == builtin.cache_dir => derived,
        (Some(cache), _) => cache,
        (None, Some(derived)) => derived,
        (None, None) => builtin.cache_dir.clone(),
    };

    Profile {
        alias: alias.to_string(),
        repository: partial
            .repository
            .clone()
            .unwrap_or_else(|| builtin.repository.clone()),
        cache_dir,
        protected_pattern: partial
            .protected_pattern
            .clone()
            .unwrap_or_else(|| builtin.protected_pattern.clone()),
        commit_message_template: partial
            .commit_message_template
            .clone()
            .unwrap_or_else(|| builtin.commit_message_template.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profile::DEFAULT_COMMIT_TEMPLATE;
    use crate::pattern::DEFAULT_PROTECTED_PATTERN;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[test]
    fn test_no_documents_yields_builtin_default() {
        let home = Path::new("/home/u");
        let resolved = resolve(&merge_documents(None, None), home);

        assert_eq!(resolved.active, "default");
        assert_eq!(resolved.profiles.len(), 1);
        assert_eq!(resolved.default_profile(), &Profile::builtin(home));
    }

    #[test]
    fn test_local_fields_and_active_win() {
        let global = doc(json!({
            "active": "work",
            "profiles": {
                "default": { "repository": "g-default" },
                "work": { "repository": "g-work", "protectedPattern": "^g-" }
            }
        }));
        let local = doc(json!({
            "active": "default",
            "profiles": { "work": { "repository": "l-work" } }
        }));

        let resolved = resolve(&merge_documents(Some(&global), Some(&local)), Path::new("/h"));
        assert_eq!(resolved.active, "default");
        let work = resolved.get("work").unwrap();
        assert_eq!(work.repository, "l-work");
        assert_eq!(work.protected_pattern, "^g-");
        assert_eq!(resolved.default_profile().repository, "g-default");
    }

    #[test]
    fn test_non_default_cache_is_derived() {
        let global = doc(json!({
            "profiles": {
                "default": { "cacheDir": "~/rules-cache" },
                "unset": {},
                "still-builtin": { "cacheDir": "~/.cursor-rules-cache" },
                "custom": { "cacheDir": "/srv/cache" }
            }
        }));
        let resolved = resolve(&merge_documents(Some(&global), None), Path::new("/h"));

        assert_eq!(resolved.default_profile().cache_dir, PathBuf::from("/h/rules-cache"));
        assert_eq!(resolved.get("unset").unwrap().cache_dir, PathBuf::from("/h/rules-cache/unset"));
        assert_eq!(
            resolved.get("still-builtin").unwrap().cache_dir,
            PathBuf::from("/h/rules-cache/still-builtin")
        );
        assert_eq!(resolved.get("custom").unwrap().cache_dir, PathBuf::from("/srv/cache"));
    }

    #[test]
    fn test_non_default_profiles_take_builtin_fields_not_default_fields() {
        let global = doc(json!({
            "profiles": {
                "default": { "protectedPattern": "^mine-" },
                "other": { "repository": "o" }
            }
        }));
        let resolved = resolve(&merge_documents(Some(&global), None), Path::new("/h"));

        let other = resolved.get("other").unwrap();
        assert_eq!(other.protected_pattern, DEFAULT_PROTECTED_PATTERN);
        assert_eq!(other.commit_message_template, DEFAULT_COMMIT_TEMPLATE);
    }

    #[test]
    fn test_dangling_active_falls_back_to_default() {
        let local = doc(json!({ "active": "gone", "profiles": {} }));
        let resolved = resolve(&merge_documents(None, Some(&local)), Path::new("/h"));
        assert_eq!(resolved.active, "default");
    }

    #[test]
    fn test_legacy_document_resolves_to_default_profile() {
        let legacy = doc(json!({ "repository": "r", "cacheDir": "c" }));
        let resolved = resolve(&merge_documents(Some(&legacy), None), Path::new("/h"));

        assert_eq!(resolved.active, "default");
        let default = resolved.default_profile();
        assert_eq!(default.repository, "r");
        assert_eq!(default.cache_dir, PathBuf::from("c"));
        assert_eq!(default.protected_pattern, DEFAULT_PROTECTED_PATTERN);
        assert_eq!(default.commit_message_template, DEFAULT_COMMIT_TEMPLATE);
    }
}
