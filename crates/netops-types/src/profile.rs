//! Named presets of field overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::{FieldValues, deserialize_layer};

/// A reusable override layer, loaded from static configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Filled from the mapping key when loaded from `profiles.yaml`.
    #[serde(default, skip_serializing)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When set, the profile may only be used with this skill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    #[serde(default, deserialize_with = "deserialize_layer")]
    pub values: FieldValues,
}

impl Profile {
    pub fn new(name: impl Into<String>, values: FieldValues) -> Self {
        Self {
            name: name.into(),
            description: None,
            skill: None,
            values,
        }
    }

    pub fn scoped_to(mut self, skill: impl Into<String>) -> Self {
        self.skill = Some(skill.into());
        self
    }
}

/// The contents of a `profiles.yaml` file: profile name -> profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ProfilesFile(pub BTreeMap<String, Profile>);

impl ProfilesFile {
    /// Consume the file, stamping each profile with its mapping key.
    pub fn into_profiles(self) -> Vec<Profile> {
        self.0
            .into_iter()
            .map(|(name, mut profile)| {
                profile.name = name;
                profile
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_profiles_file_stamps_names() {
        let yaml = r#"
major-outage:
  description: Executive-facing P1 update
  skill: incident
  values:
    severity: P1
    audience: executive
    next_update_time: null
lab-change:
  values:
    environment: lab
"#;
        let file: ProfilesFile = serde_yaml_ng::from_str(yaml).unwrap();
        let profiles = file.into_profiles();
        assert_eq!(profiles.len(), 2);

        let lab = &profiles[0];
        assert_eq!(lab.name, "lab-change");
        assert!(lab.skill.is_none());

        let outage = &profiles[1];
        assert_eq!(outage.name, "major-outage");
        assert_eq!(outage.skill.as_deref(), Some("incident"));
        assert_eq!(outage.values.len(), 2);
        assert_eq!(outage.values["severity"], Value::Text("P1".into()));
    }
}
