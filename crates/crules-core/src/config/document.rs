//! The on-disk shape of one configuration document

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::profile::{DEFAULT_ALIAS, PartialProfile};

/// Top-level keys of the pre-profiles format, moved into `profiles.default` on load.
const LEGACY_PROFILE_KEYS: &[&str] = &[
    "repository",
    "cacheDir",
    "protectedPattern",
    "projectSpecificPattern",
    "commitMessageTemplate",
    "commitMessage",
];

/// Legacy field names and the canonical names that replace them.
const RENAMED_FIELDS: &[(&str, &str)] = &[
    ("projectSpecificPattern", "protectedPattern"),
    ("commitMessage", "commitMessageTemplate"),
];

/// Drop legacy field names that are shadowed by their canonical name.
fn drop_shadowed_legacy_fields(fields: &mut Map<String, Value>) {
    for (legacy, canonical) in RENAMED_FIELDS {
        if fields.contains_key(*canonical) && fields.remove(*legacy).is_some() {
            tracing::debug!(legacy, canonical, "Ignoring legacy field shadowed by its canonical name");
        }
    }
}

/// One configuration document, global or local.
///
/// ```json
/// {
///   "active": "work",
///   "profiles": {
///     "default": { "repository": "https://example.com/rules.git" },
///     "work": { "repository": "https://example.com/work-rules.git" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,

    #[serde(default)]
    pub profiles: BTreeMap<String, PartialProfile>,

    /// Top-level keys this version does not know about
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Document {
    /// Interpret a parsed JSON value, migrating the legacy flat format.
    ///
    /// A legacy document has no `profiles` key; its profile fields become the
    /// `default` profile and every other key is kept as-is.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let Value::Object(mut map) = value else {
            return Err(serde_json::Error::custom("expected a JSON object"));
        };

        if let Some(Value::Object(profiles)) = map.get_mut("profiles") {
            for profile in profiles.values_mut() {
                if let Value::Object(fields) = profile {
                    drop_shadowed_legacy_fields(fields);
                }
            }
        }
        if map.contains_key("profiles") {
            return serde_json::from_value(Value::Object(map));
        }

        let mut legacy = Map::new();
        for key in LEGACY_PROFILE_KEYS {
            if let Some(value) = map.remove(*key) {
                legacy.insert((*key).to_string(), value);
            }
        }

        drop_shadowed_legacy_fields(&mut legacy);

        let mut document: Document = serde_json::from_value(Value::Object(map))?;
        if !legacy.is_empty() {
            tracing::debug!("Migrating legacy configuration document");
            let profile: PartialProfile = serde_json::from_value(Value::Object(legacy))?;
            document.profiles.insert(DEFAULT_ALIAS.to_string(), profile);
        }
        Ok(document)
    }
}
