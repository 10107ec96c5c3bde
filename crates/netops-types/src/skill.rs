//! Skill definitions: schema, template variants, and derivation rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::schema::Schema;
use crate::value::{FieldValues, Value, deserialize_layer};

/// Variant name used when a skill declares a single template.
pub const DEFAULT_VARIANT: &str = "default";

/// A lookup rule that fills an unset field from the values of other fields.
///
/// The key is the text form of each `from` field joined with `.`; e.g. a rule
/// keyed on `[domain, symptom_category]` looks up `firewall.high_cpu`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derivation {
    /// Field to fill.
    pub field: String,
    /// Fields whose values form the lookup key.
    pub from: Vec<String>,
    pub table: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Value>,
    /// Fail resolution when the key has no entry and no fallback.
    #[serde(default)]
    pub strict: bool,
}

/// Everything that defines one skill, as read from `skills/<name>.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Field whose value selects the template variant (e.g. `audience`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_field: Option<String>,
    /// Variant used when the variant field's value has no template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_variant: Option<String>,
    /// Variant name -> template path, relative to the config directory.
    pub templates: BTreeMap<String, String>,
    pub fields: Schema,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derive: Vec<Derivation>,
}

impl SkillDefinition {
    /// The variant to render when nothing more specific applies.
    pub fn fallback_variant(&self) -> &str {
        self.default_variant.as_deref().unwrap_or(DEFAULT_VARIANT)
    }
}

/// The contents of `defaults.yaml`: skill name -> default field values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DefaultsFile(pub BTreeMap<String, SkillDefaults>);

/// Default values registered for one skill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillDefaults(pub FieldValues);

impl<'de> Deserialize<'de> for SkillDefaults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_layer(deserializer).map(Self)
    }
}

impl DefaultsFile {
    pub fn into_map(self) -> BTreeMap<String, FieldValues> {
        self.0.into_iter().map(|(skill, d)| (skill, d.0)).collect()
    }
}
