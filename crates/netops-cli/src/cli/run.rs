//! `netops run` and the per-skill shortcut commands.

use anyhow::{Context, Result};
use chrono::Utc;

use netops_core::skill::{Skill, SkillRunner};
use netops_infra::LoadedConfig;
use netops_types::value::FieldValues;

use super::input::{build_explicit, inject_timestamp};
use super::{InputArgs, RenderArgs, interactive, output};

/// Global output flags shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub json: bool,
    pub quiet: bool,
}

/// Field bindings of a shortcut command. Empty for `netops run`.
pub type Shortcuts<'a> = &'a [(&'a str, Option<String>)];

/// Resolve, validate, render, and deliver one skill invocation.
///
/// # Examples
///
/// ```bash
/// # Generic form
/// netops run incident --set incident_title="VPN down" --set impact_summary="Users cannot connect"
///
/// # Shortcut form
/// netops incident "VPN down" "Users cannot connect" -s P1 --add checks_done="Pinged gateway"
/// ```
pub fn run_skill(
    config: &LoadedConfig,
    skill_name: &str,
    input: &InputArgs,
    render: &RenderArgs,
    shortcuts: Shortcuts<'_>,
    mode: OutputMode,
) -> Result<()> {
    let registry = &config.registry;
    let skill = registry.skill(skill_name)?;
    let profile = select_profile(config, skill_name, input.profile.as_deref())?;
    let mut explicit = build_explicit(input, shortcuts)?;

    if wants_prompts(skill, &explicit, input, render, !shortcuts.is_empty()) {
        let defaults = registry.defaults(skill_name).cloned().unwrap_or_default();
        let profile_ref = profile.as_deref().map(|name| registry.profile(name)).transpose()?;
        let prompts = interactive::plan(skill, &defaults, profile_ref, &explicit, render.detailed)?;
        interactive::ask(&prompts, &mut explicit)?;
    }

    if !input.no_timestamp {
        inject_timestamp(
            &mut explicit,
            skill.schema(),
            &config.settings.timestamp_format,
            Utc::now(),
        )?;
    }

    tracing::debug!(
        skill = %skill_name,
        profile = ?profile,
        fields = explicit.len(),
        "running skill"
    );

    let rendered = SkillRunner::new(registry)
        .run_detailed(skill_name, &explicit, profile.as_deref())
        .with_context(|| format!("Failed to run skill '{skill_name}'"))?;

    output::deliver(
        skill_name,
        &rendered,
        render.output.as_deref(),
        mode.json,
        mode.quiet,
    )
}

/// The profile to apply: the one named on the command line, else the
/// configured default when it fits this skill.
pub fn select_profile(
    config: &LoadedConfig,
    skill_name: &str,
    explicit: Option<&str>,
) -> Result<Option<String>> {
    if let Some(name) = explicit {
        return Ok(Some(name.to_string()));
    }

    let Some(ref name) = config.settings.default_profile else {
        return Ok(None);
    };
    let profile = config.registry.profile(name)?;
    match profile.skill.as_deref() {
        Some(scoped) if scoped != skill_name => {
            tracing::debug!(profile = %name, scoped_to = %scoped, "default profile does not apply");
            Ok(None)
        }
        _ => Ok(Some(name.clone())),
    }
}

/// Prompt only on an attended terminal.
fn wants_prompts(
    skill: &Skill,
    explicit: &FieldValues,
    input: &InputArgs,
    render: &RenderArgs,
    is_shortcut: bool,
) -> bool {
    console::user_attended_stderr() && prompts_needed(skill, explicit, input, render, is_shortcut)
}

/// Prompt when asked to (`--interactive` or `--detailed`), or when a shortcut
/// was given none of the skill's required fields and no input file.
fn prompts_needed(
    skill: &Skill,
    explicit: &FieldValues,
    input: &InputArgs,
    render: &RenderArgs,
    is_shortcut: bool,
) -> bool {
    if render.interactive || render.detailed {
        return true;
    }
    is_shortcut
        && input.input.is_none()
        && skill
            .schema()
            .required_fields()
            .all(|field| !explicit.contains_key(&field.name))
}

#[cfg(test)]
mod tests {
    use netops_infra::ConfigSource;
    use netops_types::value::Value;

    use super::*;

    fn config(default_profile: Option<&str>) -> LoadedConfig {
        let mut config = netops_infra::load(ConfigSource::Embedded, None).unwrap();
        config.settings.default_profile = default_profile.map(str::to_string);
        config
    }

    #[test]
    fn test_explicit_profile_wins() {
        let config = config(Some("client-comms"));
        assert_eq!(
            select_profile(&config, "incident", Some("major-incident")).unwrap(),
            Some("major-incident".to_string())
        );
    }

    #[test]
    fn test_default_profile_only_for_matching_skill() {
        let config = config(Some("client-comms"));
        assert_eq!(
            select_profile(&config, "incident", None).unwrap(),
            Some("client-comms".to_string())
        );
        assert_eq!(select_profile(&config, "fcr", None).unwrap(), None);
        assert_eq!(select_profile(&self::config(None), "fcr", None).unwrap(), None);
    }

    #[test]
    fn test_run_skill_writes_output_file() {
        let config = config(None);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fcr.md");
        let input = InputArgs {
            set: vec!["purpose=management access".to_string()],
            no_timestamp: true,
            ..Default::default()
        };
        let render = RenderArgs {
            output: Some(path.clone()),
            ..Default::default()
        };
        run_skill(
            &config,
            "fcr",
            &input,
            &render,
            &[("risk_level", Some("medium".to_string()))],
            OutputMode {
                json: false,
                quiet: true,
            },
        )
        .unwrap();

        let doc = std::fs::read_to_string(&path).unwrap();
        assert!(doc.contains("FCR Content: management access"));
        assert!(doc.contains("Moderate impact possible"));
        assert!(!doc.contains("Generated"));
    }

    #[test]
    fn test_run_skill_reports_validation_failure() {
        let config = config(None);
        let input = InputArgs {
            set: vec!["incident_title=VPN down".to_string()],
            ..Default::default()
        };
        let err = run_skill(
            &config,
            "incident",
            &input,
            &RenderArgs::default(),
            &[],
            OutputMode {
                json: false,
                quiet: true,
            },
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("impact_summary"));
    }

    #[test]
    fn test_prompts_needed() {
        let config = config(None);
        let skill = config.registry.skill("incident").unwrap();
        let none = FieldValues::new();
        let detailed = RenderArgs {
            detailed: true,
            ..Default::default()
        };

        assert!(prompts_needed(skill, &none, &InputArgs::default(), &detailed, false));
        assert!(prompts_needed(skill, &none, &InputArgs::default(), &RenderArgs::default(), true));
        assert!(!prompts_needed(skill, &none, &InputArgs::default(), &RenderArgs::default(), false));

        let titled = FieldValues::from([("incident_title".to_string(), Value::from("VPN down"))]);
        assert!(!prompts_needed(skill, &titled, &InputArgs::default(), &RenderArgs::default(), true));

        let from_file = InputArgs {
            input: Some("in.yaml".into()),
            ..Default::default()
        };
        assert!(!prompts_needed(skill, &none, &from_file, &RenderArgs::default(), true));
    }
}
