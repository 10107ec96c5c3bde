//! Builds the skill registry from a config source.
//!
//! Everything is read once, up front. Any missing or malformed file fails the
//! whole load; there is no partial registry.

use std::path::Path;

use netops_core::skill::{SkillRegistry, SkillSource};
use netops_types::config::Settings;
use netops_types::error::ConfigError;
use netops_types::profile::ProfilesFile;
use netops_types::skill::{DefaultsFile, SkillDefinition};
use serde::de::DeserializeOwned;

use crate::config::load_settings;
use crate::source::{ConfigSource, read_file};

/// A fully loaded configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub source: ConfigSource,
    pub settings: Settings,
    pub registry: SkillRegistry,
}

/// Load settings and the registry from `source`, then overlay the profiles in
/// `user_profiles` when that file exists.
pub fn load(source: ConfigSource, user_profiles: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let settings = load_settings(&source)?;
    let mut registry = load_registry(&source)?;

    if let Some(path) = user_profiles {
        let added = load_user_profiles(&mut registry, path)?;
        if added > 0 {
            tracing::debug!(path = %path.display(), profiles = added, "loaded user profiles");
        }
    }

    if let Some(ref name) = settings.default_profile {
        registry.profile(name)?;
    }

    tracing::info!(
        %source,
        skills = registry.skills().count(),
        profiles = registry.profiles().count(),
        "configuration loaded"
    );
    Ok(LoadedConfig {
        source,
        settings,
        registry,
    })
}

/// Register every skill, then the defaults registry, then profiles.
pub fn load_registry(source: &ConfigSource) -> Result<SkillRegistry, ConfigError> {
    let mut registry = SkillRegistry::new();

    for file in source.skill_files()? {
        let definition: SkillDefinition = parse_yaml(&source.read(&file)?, &file)?;
        let mut templates = std::collections::BTreeMap::new();
        for (variant, path) in &definition.templates {
            templates.insert(variant.clone(), source.read(path)?);
        }
        registry.register(SkillSource {
            definition,
            templates,
        })?;
    }

    if let Some(content) = source.read_optional("defaults.yaml")? {
        let defaults: DefaultsFile = parse_yaml(&content, "defaults.yaml")?;
        for (skill, values) in defaults.into_map() {
            registry.set_defaults(&skill, values)?;
        }
    }

    if let Some(content) = source.read_optional("profiles.yaml")? {
        let profiles: ProfilesFile = parse_yaml(&content, "profiles.yaml")?;
        for profile in profiles.into_profiles() {
            registry.add_profile(profile)?;
        }
    }

    Ok(registry)
}

/// Add profiles from a user file, replacing built-in profiles of the same
/// name. A missing file adds nothing.
pub fn load_user_profiles(registry: &mut SkillRegistry, path: &Path) -> Result<usize, ConfigError> {
    let content = match read_file(path) {
        Ok(content) => content,
        Err(ConfigError::MissingFile(_)) => return Ok(0),
        Err(err) => return Err(err),
    };

    let profiles: ProfilesFile = parse_yaml(&content, &path.display().to_string())?;
    let profiles = profiles.into_profiles();
    let count = profiles.len();
    for profile in profiles {
        registry.add_profile(profile)?;
    }
    Ok(count)
}

fn parse_yaml<T: DeserializeOwned>(content: &str, source_name: &str) -> Result<T, ConfigError> {
    serde_yaml_ng::from_str(content).map_err(|err| ConfigError::Parse {
        source_name: source_name.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const NOTICE_SKILL: &str = "\
name: notice
description: Maintenance notice
templates:
  default: templates/notice.md
fields:
  - name: title
    type: string
    required: true
  - name: window
    type: string
    default: tonight
";

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn notice_dir() -> TempDir {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "skills/notice.yaml", NOTICE_SKILL);
        write(tmp.path(), "templates/notice.md", "{{ title }} ({{ window }})");
        tmp
    }

    #[test]
    fn test_embedded_assets_load() {
        let config = load(ConfigSource::Embedded, None).unwrap();
        let names: Vec<&str> = config.registry.skills().map(|s| s.name()).collect();
        assert_eq!(names, vec!["fcr", "incident", "runbook"]);
        assert!(config.registry.profile("major-incident").is_ok());
        assert!(config.registry.defaults("incident").is_some());
    }

    #[test]
    fn test_directory_with_only_skills_loads() {
        let tmp = notice_dir();
        let config = load(ConfigSource::Directory(tmp.path().to_path_buf()), None).unwrap();
        assert!(config.registry.skill("notice").is_ok());
        assert_eq!(config.registry.profiles().count(), 0);
        assert_eq!(config.settings, Settings::default());
    }

    #[test]
    fn test_missing_template_file_fails_load() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "skills/notice.yaml", NOTICE_SKILL);
        let err = load_registry(&ConfigSource::Directory(tmp.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(ref p) if p.ends_with("templates/notice.md")));
    }

    #[test]
    fn test_malformed_skill_file_names_the_file() {
        let tmp = notice_dir();
        write(tmp.path(), "skills/broken.yaml", "name: [unclosed");
        let err = load_registry(&ConfigSource::Directory(tmp.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref source_name, .. } if source_name == "skills/broken.yaml"));
    }

    #[test]
    fn test_defaults_for_unknown_skill_fail() {
        let tmp = notice_dir();
        write(tmp.path(), "defaults.yaml", "ghost:\n  title: x\n");
        let err = load_registry(&ConfigSource::Directory(tmp.path().to_path_buf())).unwrap_err();
        assert_eq!(err, ConfigError::UnknownSkill("ghost".to_string()));
    }

    #[test]
    fn test_user_profiles_override_builtin() {
        let tmp = notice_dir();
        write(
            tmp.path(),
            "profiles.yaml",
            "late:\n  skill: notice\n  values:\n    window: late evening\n",
        );
        let user = tmp.path().join("user-profiles.yaml");
        std::fs::write(&user, "late:\n  values:\n    window: after midnight\n").unwrap();

        let config = load(ConfigSource::Directory(tmp.path().to_path_buf()), Some(&user)).unwrap();
        let profile = config.registry.profile("late").unwrap();
        assert!(profile.skill.is_none());
        assert_eq!(profile.values["window"].to_string(), "after midnight");
    }

    #[test]
    fn test_missing_user_profiles_file_is_ignored() {
        let tmp = notice_dir();
        let missing = tmp.path().join("nope.yaml");
        assert!(load(ConfigSource::Directory(tmp.path().to_path_buf()), Some(&missing)).is_ok());
    }

    #[test]
    fn test_unknown_default_profile_fails() {
        let tmp = notice_dir();
        write(tmp.path(), "settings.toml", "default_profile = \"ghost\"\n");
        let err = load(ConfigSource::Directory(tmp.path().to_path_buf()), None).unwrap_err();
        assert_eq!(err, ConfigError::ProfileNotFound("ghost".to_string()));
    }
}
