//! Startup-time registry of skills, defaults, and profiles.
//!
//! Everything is checked when it is registered: a registry that built
//! successfully holds only well-formed skill definitions with compiled
//! templates, so a run can only fail on its own input.

use std::collections::BTreeMap;

use netops_types::error::ConfigError;
use netops_types::profile::Profile;
use netops_types::record::InputRecord;
use netops_types::schema::Schema;
use netops_types::skill::SkillDefinition;
use netops_types::value::FieldValues;

use crate::template::{self, Template};

/// A skill definition together with the source text of each template variant.
#[derive(Debug, Clone)]
pub struct SkillSource {
    pub definition: SkillDefinition,
    /// Variant name -> template source.
    pub templates: BTreeMap<String, String>,
}

/// A registered skill with its templates compiled.
#[derive(Debug, Clone)]
pub struct Skill {
    definition: SkillDefinition,
    templates: BTreeMap<String, Template>,
}

impl Skill {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn description(&self) -> &str {
        &self.definition.description
    }

    pub fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    pub fn schema(&self) -> &Schema {
        &self.definition.fields
    }

    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Pick the template for `record`: the variant named by the variant
    /// field's value if one exists, otherwise the fallback variant.
    pub fn template_for(&self, record: &InputRecord) -> Option<(&str, &Template)> {
        let requested = self
            .definition
            .variant_field
            .as_deref()
            .and_then(|field| record.get(field))
            .and_then(|value| value.as_text());

        if let Some((name, template)) = requested.and_then(|v| self.templates.get_key_value(v)) {
            return Some((name.as_str(), template));
        }

        let fallback = self.definition.fallback_variant();
        self.templates
            .get_key_value(fallback)
            .map(|(name, template)| (name.as_str(), template))
    }
}

/// Name-indexed skills plus the defaults registry and profile store.
#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    skills: BTreeMap<String, Skill>,
    defaults: BTreeMap<String, FieldValues>,
    profiles: BTreeMap<String, Profile>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a skill definition and compile its templates.
    pub fn register(&mut self, source: SkillSource) -> Result<(), ConfigError> {
        let SkillSource {
            definition,
            templates: mut sources,
        } = source;
        let name = definition.name.clone();

        let invalid = |reason: String| ConfigError::InvalidSkill {
            skill: name.clone(),
            reason,
        };

        if name.trim().is_empty() {
            return Err(invalid("skill name is empty".to_string()));
        }
        if self.skills.contains_key(&name) {
            return Err(invalid("registered more than once".to_string()));
        }
        if definition.templates.is_empty() {
            return Err(invalid("no templates declared".to_string()));
        }
        if let Some(ref field) = definition.variant_field {
            if !definition.fields.contains(field) {
                return Err(invalid(format!("variant field '{field}' is not in the schema")));
            }
        }
        if !definition.templates.contains_key(definition.fallback_variant()) {
            return Err(invalid(format!(
                "default variant '{}' has no template",
                definition.fallback_variant()
            )));
        }
        for rule in &definition.derive {
            for field in std::iter::once(&rule.field).chain(&rule.from) {
                if !definition.fields.contains(field) {
                    return Err(invalid(format!(
                        "derivation of '{}' uses '{field}', which is not in the schema",
                        rule.field
                    )));
                }
            }
        }

        let mut compiled = BTreeMap::new();
        for variant in definition.templates.keys() {
            let text = sources
                .remove(variant)
                .ok_or_else(|| invalid(format!("template '{variant}' was not loaded")))?;
            let template = template::compile(&text).map_err(|source| ConfigError::Template {
                skill: name.clone(),
                variant: variant.clone(),
                source,
            })?;
            compiled.insert(variant.clone(), template);
        }

        tracing::debug!(
            skill = %name,
            variants = compiled.len(),
            fields = definition.fields.len(),
            "registered skill"
        );
        self.skills.insert(
            name,
            Skill {
                definition,
                templates: compiled,
            },
        );
        Ok(())
    }

    /// Register default values for a skill. Later calls for the same skill
    /// replace earlier ones.
    pub fn set_defaults(&mut self, skill: &str, values: FieldValues) -> Result<(), ConfigError> {
        if !self.skills.contains_key(skill) {
            return Err(ConfigError::UnknownSkill(skill.to_string()));
        }
        self.defaults.insert(skill.to_string(), values);
        Ok(())
    }

    /// Add a profile, replacing any profile of the same name.
    pub fn add_profile(&mut self, profile: Profile) -> Result<(), ConfigError> {
        if let Some(skill) = profile.skill.as_deref() {
            if !self.skills.contains_key(skill) {
                return Err(ConfigError::UnknownSkill(skill.to_string()));
            }
        }
        if let Some(previous) = self.profiles.insert(profile.name.clone(), profile) {
            tracing::debug!(profile = %previous.name, "profile overridden");
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.get(name)
    }

    pub fn skill(&self, name: &str) -> Result<&Skill, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownSkill(name.to_string()))
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// Registered defaults for `skill`, if any.
    pub fn defaults(&self, skill: &str) -> Option<&FieldValues> {
        self.defaults.get(skill)
    }

    /// Skills in name order.
    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    /// Profiles in name order.
    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }
}

#[cfg(test)]
mod tests {
    use netops_types::schema::{FieldSpec, FieldType};
    use netops_types::skill::Derivation;
    use netops_types::value::Value;

    use super::*;

    fn definition() -> SkillDefinition {
        SkillDefinition {
            name: "notice".to_string(),
            description: "Maintenance notice".to_string(),
            variant_field: Some("audience".to_string()),
            default_variant: Some("team".to_string()),
            templates: BTreeMap::from([
                ("team".to_string(), "templates/team.md".to_string()),
                ("client".to_string(), "templates/client.md".to_string()),
            ]),
            fields: Schema::new(vec![
                FieldSpec::new("title", FieldType::String).required(),
                FieldSpec::new("audience", FieldType::String).with_default("team"),
            ])
            .unwrap(),
            derive: vec![],
        }
    }

    fn source(definition: SkillDefinition) -> SkillSource {
        SkillSource {
            definition,
            templates: BTreeMap::from([
                ("team".to_string(), "Team: {{ title }}".to_string()),
                ("client".to_string(), "Client: {{ title }}".to_string()),
            ]),
        }
    }

    fn registry() -> SkillRegistry {
        let mut registry = SkillRegistry::new();
        registry.register(source(definition())).unwrap();
        registry
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = registry();
        let skill = registry.skill("notice").unwrap();
        assert_eq!(skill.name(), "notice");
        assert_eq!(skill.variants().collect::<Vec<_>>(), vec!["client", "team"]);
        assert_eq!(
            registry.skill("nope").unwrap_err(),
            ConfigError::UnknownSkill("nope".to_string())
        );
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = registry();
        let err = registry.register(source(definition())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSkill { .. }));
    }

    #[test]
    fn test_variant_selection_falls_back() {
        let registry = registry();
        let skill = registry.skill("notice").unwrap();

        let client: InputRecord = vec![("audience", Value::from("client"))].into_iter().collect();
        assert_eq!(skill.template_for(&client).unwrap().0, "client");

        let exec: InputRecord = vec![("audience", Value::from("executive"))].into_iter().collect();
        assert_eq!(skill.template_for(&exec).unwrap().0, "team");

        assert_eq!(skill.template_for(&InputRecord::new()).unwrap().0, "team");
    }

    #[test]
    fn test_bad_template_is_a_config_error() {
        let mut src = source(definition());
        src.templates.insert("client".to_string(), "{% if x %}".to_string());
        let err = SkillRegistry::new().register(src).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Template { ref variant, .. } if variant == "client"
        ));
    }

    #[test]
    fn test_missing_template_text_is_rejected() {
        let mut src = source(definition());
        src.templates.remove("client");
        assert!(matches!(
            SkillRegistry::new().register(src),
            Err(ConfigError::InvalidSkill { .. })
        ));
    }

    #[test]
    fn test_definition_consistency_checks() {
        let mut def = definition();
        def.variant_field = Some("tone".to_string());
        assert!(SkillRegistry::new().register(source(def)).is_err());

        let mut def = definition();
        def.default_variant = Some("exec".to_string());
        assert!(SkillRegistry::new().register(source(def)).is_err());

        let mut def = definition();
        def.derive.push(Derivation {
            field: "summary".to_string(),
            from: vec!["title".to_string()],
            table: BTreeMap::new(),
            fallback: None,
            strict: false,
        });
        assert!(SkillRegistry::new().register(source(def)).is_err());
    }

    #[test]
    fn test_defaults_and_profiles_require_known_skill() {
        let mut registry = registry();
        assert!(registry.set_defaults("notice", FieldValues::new()).is_ok());
        assert_eq!(
            registry.set_defaults("other", FieldValues::new()).unwrap_err(),
            ConfigError::UnknownSkill("other".to_string())
        );

        let scoped = Profile::new("p", FieldValues::new()).scoped_to("other");
        assert!(registry.add_profile(scoped).is_err());
        assert!(registry.add_profile(Profile::new("p", FieldValues::new())).is_ok());
        assert_eq!(registry.profiles().count(), 1);
        assert_eq!(
            registry.profile("q").unwrap_err(),
            ConfigError::ProfileNotFound("q".to_string())
        );
    }
}
