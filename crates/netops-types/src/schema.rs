//! Field specifications and per-skill schemas.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::value::Value;

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// Primitive type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    /// A sequence of strings.
    #[serde(alias = "sequence")]
    List,
}

impl FieldType {
    /// Whether `value` has this type, without any coercion.
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::String, Value::Text(_))
                | (Self::Number, Value::Number(_))
                | (Self::Boolean, Value::Bool(_))
                | (Self::List, Value::List(_))
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::List => write!(f, "list"),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldSpec
// ---------------------------------------------------------------------------

/// One recognized field of a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Built-in default, the lowest resolution layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allowed values. For list fields every element must be allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    /// Prompt text shown by interactive front ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            default: None,
            allowed: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_allowed<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(allowed.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Label for prompts: the description if present, else the field name.
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// The fields recognized by one skill, in declaration order.
///
/// Names are unique; construction fails on duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldSpec>", into = "Vec<FieldSpec>")]
pub struct Schema {
    fields: Vec<FieldSpec>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(fields.len());
        for (i, field) in fields.iter().enumerate() {
            if index.insert(field.name.clone(), i).is_some() {
                return Err(ConfigError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self { fields, index })
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }
}

impl TryFrom<Vec<FieldSpec>> for Schema {
    type Error = ConfigError;

    fn try_from(fields: Vec<FieldSpec>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<Schema> for Vec<FieldSpec> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_rejects_duplicate_names() {
        let result = Schema::new(vec![
            FieldSpec::new("severity", FieldType::String),
            FieldSpec::new("severity", FieldType::Number),
        ]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::DuplicateField("severity".to_string())
        );
    }

    #[test]
    fn test_schema_lookup_preserves_order() {
        let schema = Schema::new(vec![
            FieldSpec::new("b", FieldType::String).required(),
            FieldSpec::new("a", FieldType::List),
        ])
        .unwrap();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(schema.get("a").unwrap().field_type, FieldType::List);
        assert!(schema.get("c").is_none());
        assert_eq!(schema.required_fields().count(), 1);
    }

    #[test]
    fn test_schema_deserializes_from_yaml_list() {
        let yaml = r#"
- name: severity
  type: string
  default: P2
  allowed: [P1, P2, P3, P4]
- name: checks_done
  type: sequence
  default: []
- name: incident_title
  type: string
  required: true
  description: Incident title
"#;
        let schema: Schema = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(schema.len(), 3);
        let severity = schema.get("severity").unwrap();
        assert_eq!(severity.default, Some(Value::Text("P2".into())));
        assert_eq!(severity.allowed.as_ref().unwrap().len(), 4);
        assert_eq!(schema.get("checks_done").unwrap().field_type, FieldType::List);
        assert_eq!(schema.get("incident_title").unwrap().label(), "Incident title");
        assert_eq!(schema.get("severity").unwrap().label(), "severity");
    }

    #[test]
    fn test_schema_deserialize_duplicate_fails() {
        let yaml = "- {name: a, type: string}\n- {name: a, type: string}\n";
        let result: Result<Schema, _> = serde_yaml_ng::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_field_type_accepts_exact_kind_only() {
        assert!(FieldType::String.accepts(&Value::Text("x".into())));
        assert!(!FieldType::String.accepts(&Value::Number(1.0)));
        assert!(FieldType::List.accepts(&Value::List(vec![])));
        assert!(!FieldType::Boolean.accepts(&Value::Text("true".into())));
    }
}
