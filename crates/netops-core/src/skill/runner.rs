//! Executes one skill invocation end to end.

use netops_types::error::{ConfigError, SkillError};
use netops_types::value::FieldValues;

use super::registry::{Skill, SkillRegistry};
use crate::resolver;
use crate::validator::{self, ValidatedRecord};

/// A rendered document and the template variant that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub variant: String,
    pub document: String,
}

/// Runs skills against a registry: resolve, derive, validate, render.
pub struct SkillRunner<'a> {
    registry: &'a SkillRegistry,
}

impl<'a> SkillRunner<'a> {
    pub fn new(registry: &'a SkillRegistry) -> Self {
        Self { registry }
    }

    /// Produce the document for `skill`, or the first failing stage's error.
    pub fn run(
        &self,
        skill: &str,
        explicit: &FieldValues,
        profile: Option<&str>,
    ) -> Result<String, SkillError> {
        Ok(self.run_detailed(skill, explicit, profile)?.document)
    }

    /// Like [`run`](Self::run), also reporting which variant was rendered.
    pub fn run_detailed(
        &self,
        skill: &str,
        explicit: &FieldValues,
        profile: Option<&str>,
    ) -> Result<Rendered, SkillError> {
        let record = self.prepare(skill, explicit, profile)?;
        let skill = self.registry.skill(skill)?;
        self.render(skill, &record)
    }

    /// Resolve, derive, and validate without rendering.
    pub fn prepare(
        &self,
        skill: &str,
        explicit: &FieldValues,
        profile: Option<&str>,
    ) -> Result<ValidatedRecord, SkillError> {
        let skill = self.registry.skill(skill)?;
        let profile = profile
            .map(|name| self.registry.profile(name))
            .transpose()?;

        if let Some(profile) = profile {
            if let Some(ref scoped_to) = profile.skill {
                if scoped_to != skill.name() {
                    return Err(ConfigError::ProfileSkillMismatch {
                        profile: profile.name.clone(),
                        scoped_to: scoped_to.clone(),
                        skill: skill.name().to_string(),
                    }
                    .into());
                }
            }
        }

        tracing::debug!(
            skill = %skill.name(),
            profile = ?profile.map(|p| p.name.as_str()),
            explicit = explicit.len(),
            "preparing skill input"
        );

        let empty = FieldValues::new();
        let defaults = self.registry.defaults(skill.name()).unwrap_or(&empty);
        let mut record = resolver::resolve(skill.schema(), defaults, profile, explicit)?;
        let misses = resolver::derive(&mut record, &skill.definition().derive);
        let record = validator::validate(record, skill.schema())?;
        if let Some(miss) = misses.into_iter().next() {
            return Err(ConfigError::from(miss).into());
        }
        Ok(record)
    }

    /// Render an already validated record with the variant it selects.
    pub fn render(&self, skill: &Skill, record: &ValidatedRecord) -> Result<Rendered, SkillError> {
        let (variant, template) = skill.template_for(record.record()).ok_or_else(|| {
            ConfigError::InvalidSkill {
                skill: skill.name().to_string(),
                reason: format!("no template for variant '{}'", skill.definition().fallback_variant()),
            }
        })?;

        let document = template.render(record.record())?;
        tracing::info!(
            skill = %skill.name(),
            variant,
            bytes = document.len(),
            "rendered document"
        );
        Ok(Rendered {
            variant: variant.to_string(),
            document,
        })
    }
}
